//! Field metadata shared by every handle onto the same buffer.

use std::sync::{Mutex, MutexGuard, PoisonError};

use stratus_core::{DataType, FieldIdentifier, TimeStamp};

use crate::alloc_props::AllocationProperties;
use crate::error::FieldError;
use crate::tracking::FieldTracking;

/// Identifier, element type, allocation properties and tracking.
///
/// The header is the only place the element type and rank of a field
/// are recorded; typed accessors validate against it. A read-only
/// handle from [`Field::get_const`](crate::Field::get_const) shares the
/// header, so timestamp updates made through the owner are visible to it.
/// Mutation only goes through [`Field`](crate::Field), which checks the
/// handle is writable.
#[derive(Debug)]
pub struct FieldHeader {
    identifier: FieldIdentifier,
    data_type: DataType,
    alloc_props: Mutex<AllocationProperties>,
    tracking: Mutex<FieldTracking>,
}

impl FieldHeader {
    /// Header for an unallocated field.
    pub fn new(identifier: FieldIdentifier, data_type: DataType) -> Self {
        let alloc_props = AllocationProperties::new(
            identifier.name(),
            identifier.layout().clone(),
            data_type,
        );
        Self {
            identifier,
            data_type,
            alloc_props: Mutex::new(alloc_props),
            tracking: Mutex::new(FieldTracking::new()),
        }
    }

    pub(crate) fn from_parts(
        identifier: FieldIdentifier,
        data_type: DataType,
        alloc_props: AllocationProperties,
        tracking: FieldTracking,
    ) -> Self {
        Self {
            identifier,
            data_type,
            alloc_props: Mutex::new(alloc_props),
            tracking: Mutex::new(tracking),
        }
    }

    /// The field identifier.
    pub fn identifier(&self) -> &FieldIdentifier {
        &self.identifier
    }

    /// Element type of the buffer.
    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    /// Snapshot of the allocation properties.
    pub fn alloc_props(&self) -> AllocationProperties {
        self.props().clone()
    }

    /// Request a pack size for the upcoming allocation.
    ///
    /// Only reachable through [`Field::request_allocation`](crate::Field::request_allocation),
    /// which rejects read-only handles.
    pub(crate) fn request_allocation(&self, pack_size: usize) -> Result<(), FieldError> {
        self.props().request_allocation(pack_size)
    }

    /// Snapshot of the tracking state.
    pub fn tracking(&self) -> FieldTracking {
        self.track().clone()
    }

    /// Time of the last update, if any.
    pub fn time_stamp(&self) -> Option<TimeStamp> {
        self.track().time_stamp()
    }

    /// Record an update at `ts`.
    ///
    /// Only reachable through [`Field::update_time_stamp`](crate::Field::update_time_stamp),
    /// which rejects read-only handles.
    pub(crate) fn update_time_stamp(&self, ts: TimeStamp) -> Result<(), FieldError> {
        self.track().update_time_stamp(ts)
    }

    pub(crate) fn props(&self) -> MutexGuard<'_, AllocationProperties> {
        self.alloc_props
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn track(&self) -> MutexGuard<'_, FieldTracking> {
        self.tracking.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
