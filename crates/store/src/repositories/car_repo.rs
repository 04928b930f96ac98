//! In-memory repository for cars.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use garage_core::car::{CarRecord, NewCar};
use garage_core::error::StoreError;
use garage_core::store::CarStore;
use garage_core::types::DbId;

#[derive(Debug)]
struct Rows {
    /// Next id to hand out. Ids are never reused, even after deletes.
    next_id: DbId,
    cars: BTreeMap<DbId, CarRecord>,
}

/// Thread-safe car store keyed by id.
#[derive(Debug)]
pub struct InMemoryCarRepo {
    rows: Mutex<Rows>,
}

impl Default for InMemoryCarRepo {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryCarRepo {
    pub fn new() -> Self {
        Self {
            rows: Mutex::new(Rows {
                next_id: 1,
                cars: BTreeMap::new(),
            }),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Rows>, StoreError> {
        self.rows
            .lock()
            .map_err(|_| StoreError::Unavailable("car repository lock poisoned".to_string()))
    }

    /// Put an already persisted record back under its own id, replacing any
    /// row with that id. Later inserts continue after the highest id seen.
    ///
    /// Ids must be positive. Loading `DbId::MAX` leaves nothing for later
    /// inserts and is refused.
    pub fn load(&self, record: CarRecord) -> Result<(), StoreError> {
        if record.id <= 0 {
            return Err(StoreError::InvalidId(record.id));
        }
        let after = record.id.checked_add(1).ok_or(StoreError::IdExhausted)?;
        let mut rows = self.lock()?;
        rows.next_id = rows.next_id.max(after);
        tracing::debug!(id = record.id, "Loaded car");
        rows.cars.insert(record.id, record);
        Ok(())
    }

    /// All stored cars, ordered by id ascending.
    pub fn list(&self) -> Result<Vec<CarRecord>, StoreError> {
        Ok(self.lock()?.cars.values().cloned().collect())
    }

    /// Remove a car by id. Returns `true` if a row was removed.
    pub fn delete(&self, id: DbId) -> Result<bool, StoreError> {
        let removed = self.lock()?.cars.remove(&id).is_some();
        if removed {
            tracing::debug!(id, "Deleted car");
        }
        Ok(removed)
    }

    pub fn len(&self) -> Result<usize, StoreError> {
        Ok(self.lock()?.cars.len())
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }
}

impl CarStore for InMemoryCarRepo {
    fn insert(&self, car: NewCar) -> Result<CarRecord, StoreError> {
        let mut rows = self.lock()?;
        let id = rows.next_id;
        rows.next_id = id.checked_add(1).ok_or(StoreError::IdExhausted)?;

        let record = car.into_record(id);
        rows.cars.insert(id, record.clone());
        tracing::debug!(
            id,
            manufacturer = %record.manufacturer,
            model = %record.model,
            "Inserted car"
        );
        Ok(record)
    }

    fn save(&self, car: CarRecord) -> Result<CarRecord, StoreError> {
        let mut rows = self.lock()?;
        let slot = rows.cars.get_mut(&car.id).ok_or(StoreError::NotFound(car.id))?;
        *slot = car.clone();
        tracing::debug!(id = car.id, "Saved car");
        Ok(car)
    }

    fn find_by_id(&self, id: DbId) -> Result<Option<CarRecord>, StoreError> {
        Ok(self.lock()?.cars.get(&id).cloned())
    }
}
