use crate::error::{AppError, Result};
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::Arc;

/// 可以存入 Store 的记录
pub trait Record: Clone + Send + 'static {
    fn id(&self) -> u64;
}

/// 软删除标记。被标记的记录对所有读取/列表操作不可见
pub trait SoftDelete {
    fn is_deleted(&self) -> bool;
    fn mark_deleted(&mut self);
}

struct StoreInner<T> {
    records: BTreeMap<u64, T>,
    next_id: u64,
}

/// 内存存储服务
///
/// Every operation takes the single lock for its whole read-modify-write.
/// Ids are handed out from a sequence starting at 1 and never reused.
pub struct Store<T> {
    resource: &'static str,
    inner: Arc<Mutex<StoreInner<T>>>,
}

impl<T> Clone for Store<T> {
    fn clone(&self) -> Self {
        Self {
            resource: self.resource,
            inner: self.inner.clone(),
        }
    }
}

impl<T: Record> Store<T> {
    pub fn new(resource: &'static str) -> Self {
        Self {
            resource,
            inner: Arc::new(Mutex::new(StoreInner {
                records: BTreeMap::new(),
                next_id: 1,
            })),
        }
    }

    /// Allocate the next id and store the record built from it.
    pub fn insert_with<F>(&self, build: F) -> T
    where
        F: FnOnce(u64) -> T,
    {
        let mut inner = self.inner.lock();
        let id = inner.next_id;
        inner.next_id += 1;
        let record = build(id);
        inner.records.insert(id, record.clone());
        record
    }

    /// Reserve an id without storing anything yet.
    pub fn reserve_id(&self) -> u64 {
        let mut inner = self.inner.lock();
        let id = inner.next_id;
        inner.next_id += 1;
        id
    }

    pub fn get(&self, id: u64) -> Result<T> {
        self.inner
            .lock()
            .records
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::not_found(self.resource))
    }

    /// Store `record` under its own id, replacing any previous version.
    pub fn put(&self, record: T) {
        let id = record.id();
        let mut inner = self.inner.lock();
        if id >= inner.next_id {
            inner.next_id = id + 1;
        }
        inner.records.insert(id, record);
    }

    /// Read-modify-write on one record under the store lock.
    pub fn modify<F, R>(&self, id: u64, apply: F) -> Result<R>
    where
        F: FnOnce(&mut T) -> Result<R>,
    {
        let mut inner = self.inner.lock();
        let record = inner
            .records
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(self.resource))?;
        apply(record)
    }

    /// All records in id order, deleted ones included.
    pub fn list(&self) -> Vec<T> {
        self.inner.lock().records.values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: Record + SoftDelete> Store<T> {
    pub fn get_active(&self, id: u64) -> Result<T> {
        self.inner
            .lock()
            .records
            .get(&id)
            .filter(|record| !record.is_deleted())
            .cloned()
            .ok_or_else(|| AppError::not_found(self.resource))
    }

    /// Records that are not soft-deleted, in id order.
    pub fn list_active(&self) -> Vec<T> {
        self.filter_active(|_| true)
    }

    pub fn filter_active<P>(&self, predicate: P) -> Vec<T>
    where
        P: Fn(&T) -> bool,
    {
        self.inner
            .lock()
            .records
            .values()
            .filter(|record| !record.is_deleted() && predicate(record))
            .cloned()
            .collect()
    }

    /// Read-modify-write on one active record under the store lock.
    ///
    /// A missing or soft-deleted record fails with NotFound before `apply`
    /// runs, so ownership checks inside `apply` only ever see live records.
    pub fn update<F, R>(&self, id: u64, apply: F) -> Result<R>
    where
        F: FnOnce(&mut T) -> Result<R>,
    {
        let mut inner = self.inner.lock();
        let record = inner
            .records
            .get_mut(&id)
            .filter(|record| !record.is_deleted())
            .ok_or_else(|| AppError::not_found(self.resource))?;
        apply(record)
    }

    /// Logical delete: the record stays in the map with its flag set.
    pub fn delete<F>(&self, id: u64, authorize: F) -> Result<T>
    where
        F: FnOnce(&T) -> Result<()>,
    {
        self.update(id, |record| {
            authorize(record)?;
            record.mark_deleted();
            Ok(record.clone())
        })
    }
}
