//! Serde adapters for the backend's JSON shapes.
//!
//! The backend sends money as bare decimal numbers in major units and
//! sometimes sends `null` where a collection is expected.

use serde::{Deserialize, Deserializer};

/// (De)serialize [`Money`](crate::Money) as a decimal number in major units
/// of [`STORE_CURRENCY`](crate::STORE_CURRENCY).
pub mod major_units {
    use crate::{Money, STORE_CURRENCY};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(money: &Money, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(money.to_decimal())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Money, D::Error> {
        let amount = f64::deserialize(deserializer)?;
        Ok(Money::from_decimal(amount, STORE_CURRENCY))
    }

    /// Same as the parent module for optional amounts.
    pub mod option {
        use crate::{Money, STORE_CURRENCY};
        use serde::{Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(
            money: &Option<Money>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match money {
                Some(m) => serializer.serialize_some(&m.to_decimal()),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<Money>, D::Error> {
            let amount = Option::<f64>::deserialize(deserializer)?;
            Ok(amount.map(|a| Money::from_decimal(a, STORE_CURRENCY)))
        }
    }
}

/// Deserialize `null` as the type's default value.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use crate::Money;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Priced {
        #[serde(with = "super::major_units")]
        price: Money,
        #[serde(default, with = "super::major_units::option")]
        discount: Option<Money>,
        #[serde(default, deserialize_with = "super::null_as_default")]
        tags: Vec<String>,
    }

    #[test]
    fn test_major_units_read_as_minor() {
        let p: Priced = serde_json::from_str(r#"{"price": 19.99, "tags": null}"#).unwrap();
        assert_eq!(p.price.amount_minor, 1999);
        assert_eq!(p.discount, None);
        assert!(p.tags.is_empty());
    }

    #[test]
    fn test_major_units_written_as_decimal() {
        let p = Priced {
            price: Money::new(1250, crate::STORE_CURRENCY),
            discount: Some(Money::new(50, crate::STORE_CURRENCY)),
            tags: vec![],
        };
        let json = serde_json::to_value(&p).unwrap();
        assert_eq!(json["price"], serde_json::json!(12.5));
        assert_eq!(json["discount"], serde_json::json!(0.5));
    }
}
