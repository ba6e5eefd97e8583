use crate::domain::ports::PersonFields;
use serde::de::{self, IgnoredAny, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Value record. Field order here is the encode order.
///
/// Decodes from a JSON object only; positional arrays are rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Person {
    pub name: String,
    pub age: i64,
}

impl Person {
    pub fn new(name: impl Into<String>, age: i64) -> Self {
        Self {
            name: name.into(),
            age,
        }
    }
}

#[derive(Deserialize)]
#[serde(field_identifier, rename_all = "lowercase")]
enum PersonField {
    Name,
    Age,
    #[serde(other)]
    Unknown,
}

struct PersonVisitor;

impl<'de> Visitor<'de> for PersonVisitor {
    type Value = Person;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a JSON object with `name` and `age`")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Person, A::Error> {
        let mut name: Option<String> = None;
        let mut age: Option<i64> = None;

        while let Some(key) = map.next_key::<PersonField>()? {
            match key {
                PersonField::Name => {
                    if name.is_some() {
                        return Err(de::Error::duplicate_field("name"));
                    }
                    name = Some(map.next_value()?);
                }
                PersonField::Age => {
                    if age.is_some() {
                        return Err(de::Error::duplicate_field("age"));
                    }
                    age = Some(map.next_value()?);
                }
                PersonField::Unknown => {
                    map.next_value::<IgnoredAny>()?;
                }
            }
        }

        Ok(Person {
            name: name.ok_or_else(|| de::Error::missing_field("name"))?,
            age: age.ok_or_else(|| de::Error::missing_field("age"))?,
        })
    }
}

impl<'de> Deserialize<'de> for Person {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(PersonVisitor)
    }
}

impl PersonFields for Person {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn age(&self) -> i64 {
        self.age
    }
}

/// Reference record: clones share one underlying Person, so a change through
/// one handle is visible through every other.
#[derive(Debug, Clone)]
pub struct SharedPerson(Rc<RefCell<Person>>);

impl SharedPerson {
    pub fn new(name: impl Into<String>, age: i64) -> Self {
        Self::from(Person::new(name, age))
    }

    pub fn set_name(&self, name: impl Into<String>) {
        self.0.borrow_mut().name = name.into();
    }

    pub fn set_age(&self, age: i64) {
        self.0.borrow_mut().age = age;
    }

    /// Copy of the current fields.
    pub fn snapshot(&self) -> Person {
        self.0.borrow().clone()
    }

    /// True when both handles point at the same record.
    pub fn ptr_eq(&self, other: &SharedPerson) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl From<Person> for SharedPerson {
    fn from(person: Person) -> Self {
        Self(Rc::new(RefCell::new(person)))
    }
}

impl PartialEq for SharedPerson {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || *self.0.borrow() == *other.0.borrow()
    }
}

impl Eq for SharedPerson {}

impl PersonFields for SharedPerson {
    fn name(&self) -> String {
        self.0.borrow().name.clone()
    }

    fn age(&self) -> i64 {
        self.0.borrow().age
    }
}

impl Serialize for SharedPerson {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.borrow().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for SharedPerson {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Person::deserialize(deserializer).map(SharedPerson::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_person_aliases_on_clone() {
        let first = SharedPerson::new("Robin", 30);
        let second = first.clone();

        second.set_age(31);

        assert!(first.ptr_eq(&second));
        assert_eq!(first.age(), 31);
    }

    #[test]
    fn test_shared_person_equality_is_by_value() {
        let a = SharedPerson::new("Robin", 30);
        let b = SharedPerson::new("Robin", 30);

        assert!(!a.ptr_eq(&b));
        assert_eq!(a, b);

        b.set_name("Sam");
        assert_ne!(a, b);
    }

    #[test]
    fn test_person_decodes_only_from_object() {
        assert!(serde_json::from_str::<Person>(r#"["Robin", 30]"#).is_err());
        assert!(serde_json::from_str::<SharedPerson>(r#"["Robin", 30]"#).is_err());

        let person: Person =
            serde_json::from_str(r#"{"nickname": "Rob", "age": 30, "name": "Robin"}"#).unwrap();
        assert_eq!(person, Person::new("Robin", 30));
    }

    #[test]
    fn test_person_rejects_repeated_key() {
        let err = serde_json::from_str::<Person>(r#"{"name":"a","name":"b","age":1}"#).unwrap_err();
        assert!(err.to_string().starts_with("duplicate field `name`"));
    }

    #[test]
    fn test_snapshot_detaches_from_handle() {
        let shared = SharedPerson::new("Robin", 30);
        let snapshot = shared.snapshot();

        shared.set_age(40);

        assert_eq!(snapshot, Person::new("Robin", 30));
        assert_eq!(shared.snapshot().age, 40);
    }
}
