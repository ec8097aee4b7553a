pub mod assets;
pub mod info;
pub mod pokemons;
