use absensi_core::{
    AttendanceRepository, AttendanceUpdate, CollectionQuery, Document, DocumentStore, MemoryStore,
    NewAttendance, RepoError, StoreError, ValidationError,
};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

fn input(tanggal: &str, nis: &str, keterangan: &str) -> NewAttendance {
    NewAttendance {
        tanggal: tanggal.to_string(),
        nis: nis.to_string(),
        nama: "Budi Santoso".to_string(),
        kelas: "XI IPA 2".to_string(),
        alamat: None,
        notlpn: None,
        keterangan: keterangan.to_string(),
    }
}

/// Store wrapper counting every round trip, for no-network assertions.
struct CountingStore {
    inner: MemoryStore,
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl DocumentStore for CountingStore {
    async fn insert(&self, doc: Document) -> Result<String, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.insert(doc).await
    }

    async fn get(&self, id: &str) -> Result<Option<Document>, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.get(id).await
    }

    async fn update(&self, id: &str, fields: Document) -> Result<(), StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.update(id, fields).await
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.delete(id).await
    }

    async fn find(
        &self,
        query: &CollectionQuery,
    ) -> Result<Vec<(String, Document)>, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.find(query).await
    }
}

#[tokio::test]
async fn create_then_get_roundtrip_with_defaults() {
    let repo = AttendanceRepository::new(MemoryStore::new());

    let id = repo.create(&input("2024-01-15", "12345", "hadir")).await.unwrap();
    let record = repo.get_by_id(&id).await.unwrap();

    assert_eq!(record.id, id);
    assert_eq!(record.tanggal, "2024-01-15");
    assert_eq!(record.nis, "12345");
    assert_eq!(record.nama, "Budi Santoso");
    assert_eq!(record.kelas, "XI IPA 2");
    assert_eq!(record.alamat, "");
    assert_eq!(record.notlpn, "");
    assert_eq!(record.keterangan, "hadir");
    assert!(record.created_at.is_some_and(|stamp| !stamp.is_empty()));
    assert_eq!(record.updated_at, None);
    assert_eq!(record.last_shared, None);
}

#[tokio::test]
async fn create_keeps_provided_optional_fields() {
    let repo = AttendanceRepository::new(MemoryStore::new());

    let mut new = input("2024-01-15", "12345", "sakit");
    new.alamat = Some("Jl. Merdeka 10".to_string());
    new.notlpn = Some("081234567890".to_string());
    let id = repo.create(&new).await.unwrap();

    let record = repo.get_by_id(&id).await.unwrap();
    assert_eq!(record.alamat, "Jl. Merdeka 10");
    assert_eq!(record.notlpn, "081234567890");
}

#[tokio::test]
async fn create_with_missing_field_makes_no_store_call() {
    let calls = Arc::new(AtomicUsize::new(0));
    let repo = AttendanceRepository::new(CountingStore {
        inner: MemoryStore::new(),
        calls: calls.clone(),
    });

    let mut new = input("2024-01-15", "12345", "hadir");
    new.nama.clear();
    let err = repo.create(&new).await.unwrap_err();

    assert!(matches!(
        err,
        RepoError::Validation(ValidationError::MissingField("nama"))
    ));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn update_without_id_makes_no_store_call() {
    let calls = Arc::new(AtomicUsize::new(0));
    let repo = AttendanceRepository::new(CountingStore {
        inner: MemoryStore::new(),
        calls: calls.clone(),
    });

    let err = repo.update(&AttendanceUpdate::default()).await.unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(ValidationError::MissingId)
    ));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn update_overwrites_all_fields_and_refreshes_updated_at() {
    let repo = AttendanceRepository::new(MemoryStore::new());
    let id = repo.create(&input("2024-01-15", "12345", "hadir")).await.unwrap();

    let update = AttendanceUpdate {
        id: id.clone(),
        tanggal: "2024-01-16".to_string(),
        nis: "67890".to_string(),
        nama: "Siti Aminah".to_string(),
        kelas: "XI IPS 1".to_string(),
        alamat: Some("Jl. Kenanga 3".to_string()),
        notlpn: None,
        keterangan: "izin".to_string(),
    };
    repo.update(&update).await.unwrap();

    let record = repo.get_by_id(&id).await.unwrap();
    assert_eq!(record.tanggal, "2024-01-16");
    assert_eq!(record.nis, "67890");
    assert_eq!(record.nama, "Siti Aminah");
    assert_eq!(record.kelas, "XI IPS 1");
    assert_eq!(record.alamat, "Jl. Kenanga 3");
    assert_eq!(record.notlpn, "");
    assert_eq!(record.keterangan, "izin");
    assert!(record.created_at.is_some());
    let first_stamp = record.updated_at.clone().unwrap();
    assert!(!first_stamp.is_empty());

    // Millisecond-precision stamps need a real gap to compare strictly.
    tokio::time::sleep(Duration::from_millis(5)).await;
    repo.update(&update).await.unwrap();

    let record = repo.get_by_id(&id).await.unwrap();
    assert!(record.updated_at.unwrap() > first_stamp);
}

#[tokio::test]
async fn update_of_missing_record_surfaces_backend_error() {
    let repo = AttendanceRepository::new(MemoryStore::new());

    let update = AttendanceUpdate {
        id: "no-such-id".to_string(),
        ..AttendanceUpdate::default()
    };
    let err = repo.update(&update).await.unwrap_err();
    assert!(matches!(err, RepoError::Backend(_)));
}

#[tokio::test]
async fn delete_then_get_fails_not_found() {
    let repo = AttendanceRepository::new(MemoryStore::new());
    let id = repo.create(&input("2024-01-15", "12345", "hadir")).await.unwrap();

    repo.delete(&id).await.unwrap();

    let err = repo.get_by_id(&id).await.unwrap_err();
    match err {
        RepoError::NotFound(missing) => assert_eq!(missing, id),
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn delete_of_missing_record_is_noop() {
    let repo = AttendanceRepository::new(MemoryStore::new());
    repo.delete("no-such-id").await.unwrap();
}

#[tokio::test]
async fn list_all_sorts_by_date_descending() {
    let repo = AttendanceRepository::new(MemoryStore::new());
    repo.create(&input("2024-01-01", "1", "hadir")).await.unwrap();
    repo.create(&input("2024-03-01", "2", "hadir")).await.unwrap();
    repo.create(&input("2024-02-01", "3", "hadir")).await.unwrap();

    let records = repo.list_all().await.unwrap();
    let dates: Vec<&str> = records.iter().map(|r| r.tanggal.as_str()).collect();
    assert_eq!(dates, vec!["2024-03-01", "2024-02-01", "2024-01-01"]);
}

#[tokio::test]
async fn date_range_is_inclusive_on_both_ends() {
    let repo = AttendanceRepository::new(MemoryStore::new());
    repo.create(&input("2024-01-01", "1", "hadir")).await.unwrap();
    repo.create(&input("2024-01-15", "2", "hadir")).await.unwrap();
    repo.create(&input("2024-01-31", "3", "hadir")).await.unwrap();
    repo.create(&input("2024-02-01", "4", "hadir")).await.unwrap();

    let records = repo
        .list_by_date_range("2024-01-01", "2024-01-31")
        .await
        .unwrap();
    let dates: Vec<&str> = records.iter().map(|r| r.tanggal.as_str()).collect();
    assert_eq!(dates, vec!["2024-01-31", "2024-01-15", "2024-01-01"]);
}

#[tokio::test]
async fn list_by_nis_matches_exactly_and_sorts_descending() {
    let repo = AttendanceRepository::new(MemoryStore::new());
    repo.create(&input("2024-01-01", "12345", "hadir")).await.unwrap();
    repo.create(&input("2024-02-01", "12345", "sakit")).await.unwrap();
    repo.create(&input("2024-01-15", "99999", "hadir")).await.unwrap();
    repo.create(&input("2024-01-20", "1234", "hadir")).await.unwrap();

    let records = repo.list_by_nis("12345").await.unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].tanggal, "2024-02-01");
    assert_eq!(records[1].tanggal, "2024-01-01");
    assert!(records.iter().all(|r| r.nis == "12345"));
}
