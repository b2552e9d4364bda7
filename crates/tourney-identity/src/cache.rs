//! Where the signed-in user is remembered between provider instances.
//!
//! A browser keeps this in `localStorage`; here it is any type that can
//! hold one opaque byte record. The provider owns the encoding.

/// Storage slot for the encoded signed-in user.
pub trait SessionCache: Send + 'static {
    /// Returns the stored record, if any.
    fn load(&self) -> Option<Vec<u8>>;

    /// Replaces the stored record.
    fn store(&mut self, record: Vec<u8>);

    /// Removes the stored record.
    fn clear(&mut self);
}

/// An in-process [`SessionCache`].
#[derive(Debug, Clone, Default)]
pub struct MemoryCache {
    slot: Option<Vec<u8>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a record is currently stored.
    pub fn is_occupied(&self) -> bool {
        self.slot.is_some()
    }
}

impl SessionCache for MemoryCache {
    fn load(&self) -> Option<Vec<u8>> {
        self.slot.clone()
    }

    fn store(&mut self, record: Vec<u8>) {
        self.slot = Some(record);
    }

    fn clear(&mut self) {
        self.slot = None;
    }
}
