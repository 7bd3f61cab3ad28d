//! Mock repository implementations for testing
//!
//! These mocks allow testing services without database dependencies.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use filedrop_core::models::{File, FileSearchParams, SharedFileUrl, SortDirection, SortField};
use filedrop_core::AppError;
use filedrop_db::FileRepository;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

#[derive(Clone, Default)]
pub struct MockFileRepository {
    files: Arc<Mutex<HashMap<Uuid, File>>>,
    links: Arc<Mutex<Vec<SharedFileUrl>>>,
    delete_batches: Arc<Mutex<Vec<Vec<Uuid>>>>,
    get_by_id_calls: Arc<AtomicUsize>,
    get_expired_calls: Arc<AtomicUsize>,
    save_share_link_calls: Arc<AtomicUsize>,
    search_calls: Arc<AtomicUsize>,
    fail_create: Arc<AtomicBool>,
    fail_get_expired: Arc<AtomicBool>,
    fail_delete_batch: Arc<AtomicBool>,
}

impl MockFileRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_file(&self, file: File) {
        self.files.lock().unwrap().insert(file.id, file);
    }

    pub fn add_link(&self, link: SharedFileUrl) {
        self.links.lock().unwrap().push(link);
    }

    pub fn contains(&self, id: Uuid) -> bool {
        self.files.lock().unwrap().contains_key(&id)
    }

    pub fn file_count(&self) -> usize {
        self.files.lock().unwrap().len()
    }

    pub fn links(&self) -> Vec<SharedFileUrl> {
        self.links.lock().unwrap().clone()
    }

    pub fn delete_batches(&self) -> Vec<Vec<Uuid>> {
        self.delete_batches.lock().unwrap().clone()
    }

    pub fn get_by_id_calls(&self) -> usize {
        self.get_by_id_calls.load(Ordering::SeqCst)
    }

    pub fn get_expired_calls(&self) -> usize {
        self.get_expired_calls.load(Ordering::SeqCst)
    }

    pub fn save_share_link_calls(&self) -> usize {
        self.save_share_link_calls.load(Ordering::SeqCst)
    }

    pub fn search_calls(&self) -> usize {
        self.search_calls.load(Ordering::SeqCst)
    }

    pub fn fail_create(&self) {
        self.fail_create.store(true, Ordering::SeqCst);
    }

    pub fn fail_get_expired(&self) {
        self.fail_get_expired.store(true, Ordering::SeqCst);
    }

    pub fn set_fail_delete_batch(&self, fail: bool) {
        self.fail_delete_batch.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl FileRepository for MockFileRepository {
    async fn create(&self, file: &File) -> Result<File, AppError> {
        if self.fail_create.load(Ordering::SeqCst) {
            return Err(AppError::Internal("mock create failure".to_string()));
        }
        self.add_file(file.clone());
        Ok(file.clone())
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<File>, AppError> {
        self.get_by_id_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.files.lock().unwrap().get(&id).cloned())
    }

    async fn get_by_owner(&self, owner_id: Uuid) -> Result<Vec<File>, AppError> {
        let mut files: Vec<File> = self
            .files
            .lock()
            .unwrap()
            .values()
            .filter(|f| f.owner_id == owner_id)
            .cloned()
            .collect();
        files.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(files)
    }

    async fn search(
        &self,
        owner_id: Uuid,
        params: &FileSearchParams,
    ) -> Result<Vec<File>, AppError> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        let query = params.query.as_ref().map(|q| q.to_lowercase());
        let file_type = params
            .file_type
            .as_deref()
            .filter(|t| !t.is_empty())
            .map(|t| t.trim_start_matches('.').to_lowercase());
        let mut files: Vec<File> = self
            .files
            .lock()
            .unwrap()
            .values()
            .filter(|f| f.owner_id == owner_id)
            .filter(|f| {
                query
                    .as_ref()
                    .map_or(true, |q| f.name.to_lowercase().contains(q.as_str()))
            })
            .filter(|f| file_type.as_ref().map_or(true, |t| &f.file_type == t))
            .filter(|f| params.created_from.map_or(true, |from| f.created_at >= from))
            .filter(|f| params.created_to.map_or(true, |to| f.created_at <= to))
            .cloned()
            .collect();

        let (field, direction) = params.ordering();
        files.sort_by(|a, b| {
            let ord = match field {
                SortField::Name => a.name.cmp(&b.name),
                SortField::Size => a.size.cmp(&b.size),
                SortField::FileType => a.file_type.cmp(&b.file_type),
                SortField::CreatedAt => a.created_at.cmp(&b.created_at),
                SortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
            };
            match direction {
                SortDirection::Asc => ord,
                SortDirection::Desc => ord.reverse(),
            }
        });

        let offset = params.offset.unwrap_or(0).max(0) as usize;
        let limit = params.limit.map(|l| l.max(0) as usize).unwrap_or(usize::MAX);
        Ok(files.into_iter().skip(offset).take(limit).collect())
    }

    async fn save_share_link(&self, link: &SharedFileUrl) -> Result<(), AppError> {
        self.save_share_link_calls.fetch_add(1, Ordering::SeqCst);
        self.add_link(link.clone());
        Ok(())
    }

    async fn get_share_link(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<SharedFileUrl>, AppError> {
        Ok(self
            .links
            .lock()
            .unwrap()
            .iter()
            .find(|l| l.token == token && !l.is_expired(now))
            .cloned())
    }

    async fn get_expired(&self, now: DateTime<Utc>) -> Result<Vec<File>, AppError> {
        self.get_expired_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_get_expired.load(Ordering::SeqCst) {
            return Err(AppError::Internal("mock get_expired failure".to_string()));
        }
        let mut files: Vec<File> = self
            .files
            .lock()
            .unwrap()
            .values()
            .filter(|f| f.is_expired(now))
            .cloned()
            .collect();
        files.sort_by_key(|f| f.expiration_date);
        Ok(files)
    }

    async fn delete_batch(&self, ids: &[Uuid]) -> Result<u64, AppError> {
        self.delete_batches.lock().unwrap().push(ids.to_vec());
        if self.fail_delete_batch.load(Ordering::SeqCst) {
            return Err(AppError::Internal("mock delete_batch failure".to_string()));
        }
        let mut files = self.files.lock().unwrap();
        let removed = ids.iter().filter(|id| files.remove(*id).is_some()).count();
        Ok(removed as u64)
    }
}
