use crate::adapters::store::InMemoryStore;
use crate::domain::entity::{AttributeValue, ManagedObjectModel, ObjectId, StoredRow};
use crate::domain::ports::RecordStore;
use crate::utils::error::PersistenceError;
use chrono::Utc;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectState {
    /// Created in the context, never flushed.
    Inserted,
    /// Flushed, then changed again.
    Updated,
    /// Matches what the store holds.
    Saved,
}

#[derive(Debug, Clone)]
struct ManagedObject {
    entity: String,
    attributes: BTreeMap<String, AttributeValue>,
    state: ObjectState,
}

/// Session object tracking managed records until they are flushed to a store.
///
/// A context is created per session and dropped when the session ends. Every
/// mutation goes through `&mut self`, so there is exactly one writer.
pub struct PersistenceContext<S: RecordStore = InMemoryStore> {
    model: ManagedObjectModel,
    store: S,
    objects: BTreeMap<ObjectId, ManagedObject>,
    pending: BTreeSet<ObjectId>,
}

impl PersistenceContext<InMemoryStore> {
    /// Person model over an empty in-memory store.
    pub fn in_memory() -> Self {
        Self::new(ManagedObjectModel::person(), InMemoryStore::new())
    }
}

impl<S: RecordStore> PersistenceContext<S> {
    pub fn new(model: ManagedObjectModel, store: S) -> Self {
        Self {
            model,
            store,
            objects: BTreeMap::new(),
            pending: BTreeSet::new(),
        }
    }

    pub fn model(&self) -> &ManagedObjectModel {
        &self.model
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Allocates a new row bound to `entity_name` and registers it as pending.
    pub fn new_managed_record(&mut self, entity_name: &str) -> Result<ObjectId, PersistenceError> {
        if self.model.entity(entity_name).is_none() {
            return Err(PersistenceError::UnknownEntity {
                entity: entity_name.to_string(),
            });
        }

        let id = ObjectId::new();
        self.objects.insert(
            id,
            ManagedObject {
                entity: entity_name.to_string(),
                attributes: BTreeMap::new(),
                state: ObjectState::Inserted,
            },
        );
        self.pending.insert(id);

        tracing::debug!("Inserted {} {} into context", entity_name, id);
        Ok(id)
    }

    pub fn set_attribute(
        &mut self,
        id: ObjectId,
        key: &str,
        value: AttributeValue,
    ) -> Result<(), PersistenceError> {
        let object = self
            .objects
            .get_mut(&id)
            .ok_or_else(|| PersistenceError::UnknownObject { id: id.to_string() })?;

        let entity = self.model.entity(&object.entity).ok_or_else(|| {
            PersistenceError::UnknownEntity {
                entity: object.entity.clone(),
            }
        })?;

        let description =
            entity
                .attribute(key)
                .ok_or_else(|| PersistenceError::UnknownAttribute {
                    entity: entity.name.clone(),
                    attribute: key.to_string(),
                })?;

        if description.kind != value.kind() {
            return Err(PersistenceError::TypeMismatch {
                entity: entity.name.clone(),
                attribute: key.to_string(),
                expected: description.kind.to_string(),
                actual: value.kind().to_string(),
            });
        }

        object.attributes.insert(key.to_string(), value);
        if object.state == ObjectState::Saved {
            object.state = ObjectState::Updated;
        }
        self.pending.insert(id);
        Ok(())
    }

    pub fn attribute(&self, id: ObjectId, key: &str) -> Result<Option<&AttributeValue>, PersistenceError> {
        let object = self
            .objects
            .get(&id)
            .ok_or_else(|| PersistenceError::UnknownObject { id: id.to_string() })?;
        Ok(object.attributes.get(key))
    }

    pub fn state(&self, id: ObjectId) -> Option<ObjectState> {
        self.objects.get(&id).map(|o| o.state)
    }

    /// Ids waiting for the next `save`, in id order.
    pub fn pending(&self) -> impl Iterator<Item = ObjectId> + '_ {
        self.pending.iter().copied()
    }

    pub fn is_pending(&self, id: ObjectId) -> bool {
        self.pending.contains(&id)
    }

    pub fn has_changes(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn registered_count(&self) -> usize {
        self.objects.len()
    }

    /// Drops an object that has never been flushed. Saved objects stay, since
    /// there is no deletion flow.
    pub fn discard(&mut self, id: ObjectId) -> bool {
        match self.objects.get(&id).map(|o| o.state) {
            Some(ObjectState::Inserted) => {
                self.objects.remove(&id);
                self.pending.remove(&id);
                true
            }
            _ => false,
        }
    }

    /// Flushes every pending object to the store in one write.
    ///
    /// Returns the number of rows written. On error nothing in the context
    /// changes, and the store is left as it was.
    pub fn save(&mut self) -> Result<usize, PersistenceError> {
        if self.pending.is_empty() {
            tracing::debug!("Nothing to save");
            return Ok(0);
        }

        let saved_at = Utc::now();
        let mut rows = Vec::with_capacity(self.pending.len());

        for id in &self.pending {
            let object = self
                .objects
                .get(id)
                .ok_or_else(|| PersistenceError::UnknownObject { id: id.to_string() })?;
            self.validate_object(*id, object)?;

            rows.push(StoredRow {
                id: *id,
                entity: object.entity.clone(),
                attributes: object.attributes.clone(),
                saved_at,
            });
        }

        if let Err(e) = self.store.write_rows(&rows) {
            tracing::warn!("Save rejected by store, {} rows stay pending: {}", rows.len(), e);
            return Err(e);
        }

        for id in std::mem::take(&mut self.pending) {
            if let Some(object) = self.objects.get_mut(&id) {
                object.state = ObjectState::Saved;
            }
        }

        tracing::info!("Saved {} rows", rows.len());
        Ok(rows.len())
    }

    /// Rows of `entity` currently held by the store.
    pub fn fetch(&self, entity: &str) -> Result<Vec<StoredRow>, PersistenceError> {
        if self.model.entity(entity).is_none() {
            return Err(PersistenceError::UnknownEntity {
                entity: entity.to_string(),
            });
        }
        self.store.read_rows(entity)
    }

    fn validate_object(&self, id: ObjectId, object: &ManagedObject) -> Result<(), PersistenceError> {
        let entity = self.model.entity(&object.entity).ok_or_else(|| {
            PersistenceError::UnknownEntity {
                entity: object.entity.clone(),
            }
        })?;

        for attribute in entity.required_attributes() {
            if !object.attributes.contains_key(&attribute.name) {
                return Err(PersistenceError::ValidationFailed {
                    entity: entity.name.clone(),
                    id: id.to_string(),
                    reason: format!("required attribute '{}' is missing", attribute.name),
                });
            }
        }
        Ok(())
    }
}
