use crate::core::context::PersistenceContext;
use crate::domain::entity::{AttributeValue, ObjectId, PERSON_ENTITY};
use crate::domain::model::Person;
use crate::domain::ports::RecordStore;
use crate::utils::error::PersistenceError;

/// Handle to a `Person` row living in a `PersistenceContext`.
///
/// The handle owns no data; fields are read from and written to the context
/// it was created in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ManagedPerson {
    id: ObjectId,
}

impl ManagedPerson {
    /// Empty row, pending in `context` until populated and saved.
    pub fn create<S: RecordStore>(context: &mut PersistenceContext<S>) -> Result<Self, PersistenceError> {
        let id = context.new_managed_record(PERSON_ENTITY)?;
        Ok(Self { id })
    }

    /// New row populated from `person`. Nothing stays registered if populating fails.
    pub fn insert<S: RecordStore>(
        context: &mut PersistenceContext<S>,
        person: &Person,
    ) -> Result<Self, PersistenceError> {
        let record = Self::create(context)?;
        if let Err(e) = record.apply(context, person) {
            context.discard(record.id);
            return Err(e);
        }
        Ok(record)
    }

    pub fn id(&self) -> ObjectId {
        self.id
    }

    pub fn apply<S: RecordStore>(
        &self,
        context: &mut PersistenceContext<S>,
        person: &Person,
    ) -> Result<(), PersistenceError> {
        self.set_name(context, &person.name)?;
        self.set_age(context, person.age)
    }

    pub fn set_name<S: RecordStore>(
        &self,
        context: &mut PersistenceContext<S>,
        name: &str,
    ) -> Result<(), PersistenceError> {
        context.set_attribute(self.id, "name", AttributeValue::from(name))
    }

    pub fn set_age<S: RecordStore>(
        &self,
        context: &mut PersistenceContext<S>,
        age: i64,
    ) -> Result<(), PersistenceError> {
        context.set_attribute(self.id, "age", AttributeValue::Integer(age))
    }

    pub fn name<S: RecordStore>(&self, context: &PersistenceContext<S>) -> Result<Option<String>, PersistenceError> {
        Ok(context
            .attribute(self.id, "name")?
            .and_then(AttributeValue::as_str)
            .map(str::to_string))
    }

    pub fn age<S: RecordStore>(&self, context: &PersistenceContext<S>) -> Result<Option<i64>, PersistenceError> {
        Ok(context.attribute(self.id, "age")?.and_then(AttributeValue::as_i64))
    }

    /// Plain copy of the row. Fails while either field is unset.
    pub fn to_person<S: RecordStore>(&self, context: &PersistenceContext<S>) -> Result<Person, PersistenceError> {
        let missing = |attribute: &str| PersistenceError::ValidationFailed {
            entity: PERSON_ENTITY.to_string(),
            id: self.id.to_string(),
            reason: format!("attribute '{}' is not set", attribute),
        };

        let name = self.name(context)?.ok_or_else(|| missing("name"))?;
        let age = self.age(context)?.ok_or_else(|| missing("age"))?;
        Ok(Person { name, age })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::{AttributeDescription, AttributeKind, EntityDescription, ManagedObjectModel};
    use crate::adapters::store::InMemoryStore;

    #[test]
    fn test_insert_then_read_back() {
        let mut ctx = PersistenceContext::in_memory();
        let record = ManagedPerson::insert(&mut ctx, &Person::new("Robin", 30)).unwrap();

        assert!(ctx.is_pending(record.id()));
        assert_eq!(record.name(&ctx).unwrap().as_deref(), Some("Robin"));
        assert_eq!(record.to_person(&ctx).unwrap(), Person::new("Robin", 30));
    }

    #[test]
    fn test_to_person_requires_both_fields() {
        let mut ctx = PersistenceContext::in_memory();
        let record = ManagedPerson::create(&mut ctx).unwrap();
        record.set_name(&mut ctx, "Robin").unwrap();

        let err = record.to_person(&ctx).unwrap_err();
        assert!(err.to_string().contains("age"));
    }

    #[test]
    fn test_insert_rolls_back_on_model_mismatch() {
        // age stored as text in this model, so populating from Person fails
        let model = ManagedObjectModel::new().with_entity(EntityDescription::new(
            PERSON_ENTITY,
            vec![
                AttributeDescription::required("name", AttributeKind::String),
                AttributeDescription::required("age", AttributeKind::String),
            ],
        ));
        let mut ctx = PersistenceContext::new(model, InMemoryStore::new());

        let err = ManagedPerson::insert(&mut ctx, &Person::new("Robin", 30)).unwrap_err();

        assert!(matches!(err, PersistenceError::TypeMismatch { .. }));
        assert_eq!(ctx.registered_count(), 0);
        assert!(!ctx.has_changes());
    }
}
