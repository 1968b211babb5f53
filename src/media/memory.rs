use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use super::{MediaError, MediaKey, MediaStore};

/// Keeps objects in memory. Clones share the same objects,
/// so a test can keep one handle and give another to the repository.
#[derive(Debug, Clone, Default)]
pub struct MemoryMediaStore {
    objects: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    failing: Arc<Mutex<bool>>,
}

impl MemoryMediaStore {
    pub fn contains(&self, key: &MediaKey) -> bool {
        self.objects.lock().unwrap().contains_key(&key.to_string())
    }

    pub fn len(&self) -> usize {
        self.objects.lock().unwrap().len()
    }

    /// makes every following call fail as if the host was down
    pub fn set_failing(&self, failing: bool) {
        *self.failing.lock().unwrap() = failing;
    }

    fn check_available(&self) -> Result<(), MediaError> {
        if *self.failing.lock().unwrap() {
            Err(MediaError::Rejected {
                status: 503,
                message: "media host unavailable".to_string(),
            })
        } else {
            Ok(())
        }
    }
}

impl MediaStore for MemoryMediaStore {
    fn upload(&self, key: &MediaKey, file_name: &str, data: &[u8]) -> Result<String, MediaError> {
        self.check_available()?;
        self.objects
            .lock()
            .unwrap()
            .insert(key.to_string(), data.to_vec());
        Ok(format!("memory://{key}/{file_name}"))
    }

    fn delete(&self, key: &MediaKey) -> Result<(), MediaError> {
        self.check_available()?;
        match self.objects.lock().unwrap().remove(&key.to_string()) {
            Some(_) => Ok(()),
            None => Err(MediaError::NotFound(key.clone())),
        }
    }
}
