//! In-memory record store backed by a JSON file.
//!
//! The whole collection lives in a `Vec` behind an `RwLock`; every mutation
//! rewrites the backing file in full (pretty-printed) before returning. The
//! file is read once at startup and never re-read.

mod records;

pub use records::{
    CreateRecordRequest, PAGE_SIZE, Pagination, Record, RecordPage, UpdateRecordRequest,
};

use std::fmt;
use std::fs;
use std::io;
use std::path::PathBuf;

use parking_lot::RwLock;

#[derive(Debug)]
pub enum StoreError {
    /// Requested page is past the end of a non-empty collection.
    PageOutOfRange { page: usize, total_pages: usize },
    /// No record carries the given id.
    NotFound { id: u64 },
    /// Create request lacked one or more required fields.
    MissingFields(Vec<&'static str>),
    /// Persisting the collection to the backing file failed.
    Io(io::Error),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::PageOutOfRange { page, total_pages } => {
                write!(f, "page {} is out of range (total pages: {})", page, total_pages)
            }
            StoreError::NotFound { id } => write!(f, "no record with id {}", id),
            StoreError::MissingFields(fields) => {
                write!(f, "missing required fields: {}", fields.join(", "))
            }
            StoreError::Io(e) => write!(f, "failed to persist store: {}", e),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for StoreError {
    fn from(e: io::Error) -> Self {
        StoreError::Io(e)
    }
}

/// Owns the record collection and its backing file. Shared across request
/// handlers via `web::Data`; interior mutability through `parking_lot`.
pub struct RecordStore {
    path: PathBuf,
    records: RwLock<Vec<Record>>,
}

impl RecordStore {
    /// Load the store from `path`. A missing file is not an error: the store
    /// starts empty and the file appears on the first successful mutation.
    pub fn load(path: impl Into<PathBuf>) -> io::Result<Self> {
        let path = path.into();
        let records = if path.exists() {
            let raw = fs::read_to_string(&path)?;
            serde_json::from_str::<Vec<Record>>(&raw)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?
        } else {
            log::warn!("Backing file {} not found, starting empty", path.display());
            Vec::new()
        };
        Ok(Self {
            path,
            records: RwLock::new(records),
        })
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    /// One page of records, fixed page size 20. `page` is 1-based and must
    /// already be coerced to >= 1 by the caller.
    pub fn list_page(&self, page: usize) -> Result<RecordPage, StoreError> {
        let records = self.records.read();
        let total_count = records.len();
        let total_pages = total_count.div_ceil(PAGE_SIZE);

        if total_pages > 0 && page > total_pages {
            return Err(StoreError::PageOutOfRange { page, total_pages });
        }

        // saturate: on an empty store any page is accepted and huge values
        // would otherwise overflow the multiplication
        let start = (page - 1).saturating_mul(PAGE_SIZE);
        let data: Vec<Record> = records.iter().skip(start).take(PAGE_SIZE).cloned().collect();

        Ok(RecordPage {
            data,
            pagination: Pagination {
                current_page: page,
                total_pages,
                total_count,
                page_size: PAGE_SIZE,
                has_next_page: page < total_pages,
                has_previous_page: page > 1 && total_pages > 0,
            },
        })
    }

    /// Case-insensitive substring match against every language value of
    /// `name`. Matches keep store order.
    pub fn search(&self, query: &str) -> Vec<Record> {
        let needle = query.to_lowercase();
        self.records
            .read()
            .iter()
            .filter(|r| r.name.values().any(|v| v.to_lowercase().contains(&needle)))
            .cloned()
            .collect()
    }

    pub fn get(&self, id: u64) -> Result<Record, StoreError> {
        self.records
            .read()
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or(StoreError::NotFound { id })
    }

    /// Append a new record with id `max(existing) + 1` (1 when empty) and
    /// persist. The store is untouched when required fields are missing.
    pub fn create(&self, request: CreateRecordRequest) -> Result<Record, StoreError> {
        let missing = request.missing_fields();
        if !missing.is_empty() {
            return Err(StoreError::MissingFields(missing));
        }

        let mut records = self.records.write();
        let id = records.iter().map(|r| r.id).max().map_or(1, |max| max + 1);

        let mut extra = request.extra;
        // ids are store-assigned; a client-sent "id" would collide with the
        // typed field on serialization
        extra.remove("id");

        let record = Record {
            id,
            name: request.name.unwrap_or_default(),
            types: request.types.unwrap_or_default(),
            base: request.base.unwrap_or_default(),
            extra,
        };
        records.push(record.clone());
        self.persist(&records)?;
        Ok(record)
    }

    /// Shallow merge: present typed fields replace wholesale, extra fields
    /// merge key-by-key. `id` is immutable.
    pub fn update(&self, id: u64, patch: UpdateRecordRequest) -> Result<Record, StoreError> {
        let mut records = self.records.write();
        let record = records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(StoreError::NotFound { id })?;

        if let Some(name) = patch.name {
            record.name = name;
        }
        if let Some(types) = patch.types {
            record.types = types;
        }
        if let Some(base) = patch.base {
            record.base = base;
        }
        for (key, value) in patch.extra {
            if key == "id" {
                continue;
            }
            record.extra.insert(key, value);
        }

        let updated = record.clone();
        self.persist(&records)?;
        Ok(updated)
    }

    /// Remove the first record with the given id and persist.
    pub fn delete(&self, id: u64) -> Result<Record, StoreError> {
        let mut records = self.records.write();
        let index = records
            .iter()
            .position(|r| r.id == id)
            .ok_or(StoreError::NotFound { id })?;
        let removed = records.remove(index);
        self.persist(&records)?;
        Ok(removed)
    }

    /// Rewrite the whole collection to the backing file: serialize to a
    /// sibling temp file, then rename over the target.
    fn persist(&self, records: &[Record]) -> io::Result<()> {
        let json = serde_json::to_string_pretty(&records)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json + "\n")?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    #[cfg(test)]
    fn all(&self) -> Vec<Record> {
        self.records.read().clone()
    }
}

/// Parse a page number from its raw query-string form. Non-numeric or
/// non-positive values coerce to 1 rather than erroring.
pub fn parse_page(raw: Option<&str>) -> usize {
    raw.and_then(|s| s.parse::<usize>().ok())
        .filter(|&p| p >= 1)
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn create_request(english_name: &str) -> CreateRecordRequest {
        serde_json::from_value(json!({
            "name": {
                "english": english_name,
                "japanese": format!("{}-jp", english_name),
                "chinese": format!("{}-cn", english_name),
                "french": format!("{}-fr", english_name)
            },
            "type": ["Grass", "Poison"],
            "base": { "HP": 45, "Attack": 49 }
        }))
        .unwrap()
    }

    fn seeded_store(dir: &TempDir, count: usize) -> RecordStore {
        let store = RecordStore::load(dir.path().join("pokedex.json")).unwrap();
        for i in 1..=count {
            store.create(create_request(&format!("Mon{}", i))).unwrap();
        }
        store
    }

    #[test]
    fn test_create_assigns_sequential_ids() {
        let dir = TempDir::new().unwrap();
        let store = seeded_store(&dir, 3);
        let ids: Vec<u64> = store.all().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_create_missing_fields_does_not_mutate() {
        let dir = TempDir::new().unwrap();
        let store = seeded_store(&dir, 1);

        let request: CreateRecordRequest = serde_json::from_value(json!({
            "name": { "english": "Typeless" },
            "base": { "HP": 10 }
        }))
        .unwrap();

        match store.create(request) {
            Err(StoreError::MissingFields(fields)) => assert_eq!(fields, vec!["type"]),
            other => panic!("expected MissingFields, got {:?}", other.map(|r| r.id)),
        }
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_create_strips_client_sent_id() {
        let dir = TempDir::new().unwrap();
        let store = seeded_store(&dir, 1);

        let request: CreateRecordRequest = serde_json::from_value(json!({
            "id": 999,
            "name": { "english": "Impostor" },
            "type": ["Normal"],
            "base": { "HP": 10 }
        }))
        .unwrap();

        let created = store.create(request).unwrap();
        assert_eq!(created.id, 2);
        assert!(!created.extra.contains_key("id"));
    }

    #[test]
    fn test_get_round_trip_and_not_found() {
        let dir = TempDir::new().unwrap();
        let store = seeded_store(&dir, 2);

        let created = store.create(create_request("Fresh")).unwrap();
        let fetched = store.get(created.id).unwrap();
        assert_eq!(fetched, created);

        assert!(matches!(store.get(99), Err(StoreError::NotFound { id: 99 })));
    }

    #[test]
    fn test_update_merges_shallowly() {
        let dir = TempDir::new().unwrap();
        let store = seeded_store(&dir, 1);

        let patch: UpdateRecordRequest = serde_json::from_value(json!({
            "type": ["Fire"],
            "species": "Seed Pokemon",
            "id": 42
        }))
        .unwrap();

        let updated = store.update(1, patch).unwrap();
        assert_eq!(updated.id, 1, "id is not patchable");
        assert_eq!(updated.types, vec!["Fire"]);
        assert_eq!(updated.name.get("english").unwrap(), "Mon1");
        assert_eq!(updated.extra["species"], "Seed Pokemon");

        assert!(matches!(
            store.update(7, UpdateRecordRequest::default()),
            Err(StoreError::NotFound { id: 7 })
        ));
    }

    #[test]
    fn test_delete_then_get_misses() {
        let dir = TempDir::new().unwrap();
        let store = seeded_store(&dir, 3);

        let removed = store.delete(2).unwrap();
        assert_eq!(removed.id, 2);
        assert!(matches!(store.get(2), Err(StoreError::NotFound { .. })));
        assert_eq!(store.len(), 2);
        assert!(matches!(store.delete(2), Err(StoreError::NotFound { .. })));
    }

    #[test]
    fn test_id_reuses_max_plus_one_after_delete() {
        let dir = TempDir::new().unwrap();
        let store = seeded_store(&dir, 3);

        store.delete(3).unwrap();
        let created = store.create(create_request("Reborn")).unwrap();
        assert_eq!(created.id, 3);
    }

    #[test]
    fn test_list_page_boundaries() {
        let dir = TempDir::new().unwrap();
        let store = seeded_store(&dir, 25);

        let first = store.list_page(1).unwrap();
        assert_eq!(first.data.len(), 20);
        assert_eq!(first.pagination.total_pages, 2);
        assert_eq!(first.pagination.total_count, 25);
        assert!(first.pagination.has_next_page);
        assert!(!first.pagination.has_previous_page);

        let second = store.list_page(2).unwrap();
        let ids: Vec<u64> = second.data.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![21, 22, 23, 24, 25]);
        assert!(!second.pagination.has_next_page);
        assert!(second.pagination.has_previous_page);

        assert!(matches!(
            store.list_page(3),
            Err(StoreError::PageOutOfRange { page: 3, total_pages: 2 })
        ));
    }

    #[test]
    fn test_list_page_on_empty_store() {
        let dir = TempDir::new().unwrap();
        let store = RecordStore::load(dir.path().join("pokedex.json")).unwrap();

        let page = store.list_page(1).unwrap();
        assert!(page.data.is_empty());
        assert_eq!(page.pagination.total_pages, 0);
        assert!(!page.pagination.has_previous_page);
    }

    #[test]
    fn test_list_page_huge_page_on_empty_store() {
        let dir = TempDir::new().unwrap();
        let store = RecordStore::load(dir.path().join("pokedex.json")).unwrap();

        let page = parse_page(Some("18446744073709551615"));
        let result = store.list_page(page).unwrap();
        assert!(result.data.is_empty());
        assert_eq!(result.pagination.total_pages, 0);
        assert!(!result.pagination.has_next_page);
    }

    #[test]
    fn test_search_is_case_insensitive_across_languages() {
        let dir = TempDir::new().unwrap();
        let store = seeded_store(&dir, 0);
        store.create(create_request("Bulbasaur")).unwrap();
        store.create(create_request("Charmander")).unwrap();

        let hits = store.search("BULBA");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, 1);

        // substring of a non-english value
        let hits = store.search("charmander-jp");
        assert_eq!(hits.len(), 1);

        assert!(store.search("mewtwo").is_empty());
    }

    #[test]
    fn test_search_preserves_store_order() {
        let dir = TempDir::new().unwrap();
        let store = seeded_store(&dir, 0);
        store.create(create_request("Alpha")).unwrap();
        store.create(create_request("Beta")).unwrap();
        store.create(create_request("Alphabet")).unwrap();

        let ids: Vec<u64> = store.search("alpha").iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_backing_file_mirrors_store_after_mutations() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("pokedex.json");
        let store = RecordStore::load(&path).unwrap();

        store.create(create_request("One")).unwrap();
        store.create(create_request("Two")).unwrap();
        store
            .update(1, serde_json::from_value(json!({ "type": ["Water"] })).unwrap())
            .unwrap();
        store.delete(2).unwrap();

        let on_disk: Vec<Record> =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(on_disk, store.all());
    }

    #[test]
    fn test_reload_round_trips_through_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("pokedex.json");
        {
            let store = RecordStore::load(&path).unwrap();
            store.create(create_request("Persist")).unwrap();
        }
        let reloaded = RecordStore::load(&path).unwrap();
        assert_eq!(reloaded.len(), 1);
        assert_eq!(reloaded.get(1).unwrap().name.get("english").unwrap(), "Persist");
    }

    #[test]
    fn test_parse_page_coercion() {
        assert_eq!(parse_page(None), 1);
        assert_eq!(parse_page(Some("abc")), 1);
        assert_eq!(parse_page(Some("-3")), 1);
        assert_eq!(parse_page(Some("0")), 1);
        assert_eq!(parse_page(Some("2")), 2);
    }
}
