//! Persistence seam for car records.

use crate::car::{CarRecord, NewCar};
use crate::error::StoreError;
use crate::types::DbId;

/// Storage collaborator used by [`crate::codec::CarCodec`].
///
/// Implementations own id assignment; the codec never picks an id itself.
pub trait CarStore {
    /// Persist a new car and return it with its assigned id.
    fn insert(&self, car: NewCar) -> Result<CarRecord, StoreError>;

    /// Overwrite the stored row whose id matches `car.id`.
    fn save(&self, car: CarRecord) -> Result<CarRecord, StoreError>;

    fn find_by_id(&self, id: DbId) -> Result<Option<CarRecord>, StoreError>;
}
