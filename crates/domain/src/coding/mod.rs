//! Typed decoding and encoding between wire values and domain types.
//!
//! A [`Convertible`] type reads its fields through a [`DecodeContext`] and
//! writes them through an [`EncodeContext`]. Types that travel behind a
//! discriminator are registered in a [`TypeRegistry`].

mod convertible;
mod decode;
mod encode;
mod registry;
mod scalar;

pub use convertible::{AnyConvertible, Convertible};
pub use decode::{DecodeContext, UserContext};
pub use encode::{EncodeContext, polymorphic_fields};
pub use registry::{DISCRIMINATOR_KEY, TypeRegistry};
pub use scalar::WireScalar;

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::error::{DecodeError, DecodeResult, EncodeResult};
    use crate::transform::{TransformError, UrlTransformer, ValueTransformer};
    use crate::wire::{FieldMap, WireKind, WireValue};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use url::Url;

    fn fields(value: serde_json::Value) -> FieldMap {
        match WireValue::from_json(value) {
            WireValue::Object(fields) => fields,
            other => panic!("expected object, got {other:?}"),
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    struct Address {
        street: String,
        city: String,
    }

    impl Convertible for Address {
        const TYPE_NAME: &'static str = "Address";

        fn decode(ctx: &DecodeContext<'_>) -> DecodeResult<Self> {
            Ok(Self {
                street: ctx.decode("street")?,
                city: ctx.decode("city")?,
            })
        }

        fn encode(&self, ctx: &mut EncodeContext) -> EncodeResult<()> {
            ctx.encode("street", &self.street);
            ctx.encode("city", &self.city);
            Ok(())
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    struct Company {
        name: String,
        employees: i32,
        website: Option<Url>,
        address: Option<Address>,
        offices: Vec<Address>,
        tags: Vec<String>,
    }

    impl Convertible for Company {
        const TYPE_NAME: &'static str = "Company";

        fn decode(ctx: &DecodeContext<'_>) -> DecodeResult<Self> {
            Ok(Self {
                name: ctx.decode("name")?,
                employees: ctx.decode("employees")?,
                website: ctx.decode_opt_with("website", &UrlTransformer)?,
                address: ctx.decode_object_opt("address")?,
                offices: ctx.decode_object_array_opt("offices")?.unwrap_or_default(),
                tags: ctx.decode_array_opt("tags")?.unwrap_or_default(),
            })
        }

        fn encode(&self, ctx: &mut EncodeContext) -> EncodeResult<()> {
            ctx.encode("name", &self.name);
            ctx.encode("employees", &self.employees);
            ctx.encode_opt_with("website", self.website.as_ref(), &UrlTransformer);
            ctx.encode_object_opt("address", self.address.as_ref())?;
            ctx.encode_object_array("offices", &self.offices)?;
            ctx.encode_array("tags", &self.tags);
            Ok(())
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    struct Dog {
        name: String,
        good: bool,
    }

    impl Convertible for Dog {
        const TYPE_NAME: &'static str = "Dog";

        fn decode(ctx: &DecodeContext<'_>) -> DecodeResult<Self> {
            Ok(Self {
                name: ctx.decode("name")?,
                good: ctx.decode("good")?,
            })
        }

        fn encode(&self, ctx: &mut EncodeContext) -> EncodeResult<()> {
            ctx.encode("name", &self.name);
            ctx.encode("good", &self.good);
            Ok(())
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    struct Cat {
        name: String,
        lives: u8,
    }

    impl Convertible for Cat {
        const TYPE_NAME: &'static str = "Cat";

        fn decode(ctx: &DecodeContext<'_>) -> DecodeResult<Self> {
            Ok(Self {
                name: ctx.decode("name")?,
                lives: ctx.decode("lives")?,
            })
        }

        fn encode(&self, ctx: &mut EncodeContext) -> EncodeResult<()> {
            ctx.encode("name", &self.name);
            ctx.encode("lives", &self.lives);
            Ok(())
        }
    }

    #[derive(Debug)]
    struct Shelter {
        pets: Vec<Box<dyn AnyConvertible>>,
        favourite: Dog,
    }

    impl Convertible for Shelter {
        const TYPE_NAME: &'static str = "Shelter";

        fn decode(ctx: &DecodeContext<'_>) -> DecodeResult<Self> {
            Ok(Self {
                pets: ctx.decode_polymorphic_array("pets")?,
                favourite: ctx.decode_polymorphic_as("favourite")?,
            })
        }

        fn encode(&self, ctx: &mut EncodeContext) -> EncodeResult<()> {
            ctx.encode_polymorphic_array("pets", &self.pets)?;
            ctx.encode_polymorphic("favourite", &self.favourite)
        }
    }

    /// Decoder that scales its value by a factor passed as user context.
    #[derive(Debug)]
    struct Scaled(i64);

    impl Convertible for Scaled {
        const TYPE_NAME: &'static str = "Scaled";

        fn decode(ctx: &DecodeContext<'_>) -> DecodeResult<Self> {
            let factor = ctx.user_context::<i64>().copied().unwrap_or(1);
            Ok(Self(ctx.decode::<i64>("value")? * factor))
        }

        fn encode(&self, ctx: &mut EncodeContext) -> EncodeResult<()> {
            ctx.encode("value", &self.0);
            Ok(())
        }
    }

    #[derive(Debug)]
    struct Wrapper {
        inner: Scaled,
    }

    impl Convertible for Wrapper {
        const TYPE_NAME: &'static str = "Wrapper";

        fn decode(ctx: &DecodeContext<'_>) -> DecodeResult<Self> {
            Ok(Self {
                inner: ctx.decode_object("inner")?,
            })
        }

        fn encode(&self, ctx: &mut EncodeContext) -> EncodeResult<()> {
            ctx.encode_object("inner", &self.inner)
        }
    }

    struct Ordinal;

    impl ValueTransformer for Ordinal {
        type Wire = String;
        type Domain = i32;

        fn transformed_value(&self, value: String) -> Result<i32, TransformError> {
            value
                .trim_end_matches(|c: char| c.is_ascii_alphabetic())
                .parse()
                .map_err(|_| TransformError::InvalidValue(format!("'{value}' is not an ordinal")))
        }

        fn reverse_transformed_value(&self, value: &i32) -> String {
            let suffix = match (value % 10, value % 100) {
                (1, n) if n != 11 => "st",
                (2, n) if n != 12 => "nd",
                (3, n) if n != 13 => "rd",
                _ => "th",
            };
            format!("{value}{suffix}")
        }
    }

    fn registry() -> TypeRegistry {
        TypeRegistry::new().with::<Dog>().with::<Cat>()
    }

    #[test]
    fn test_decode_full_company() {
        let input = fields(json!({
            "name": "Apple",
            "employees": 132_000,
            "website": "https://apple.com",
            "address": {"street": "1 Apple Park Way", "city": "Cupertino"},
            "offices": [{"street": "Hollywood Rd", "city": "Cork"}],
            "tags": ["hardware", "software"]
        }));

        let company: Company = TypeRegistry::new().deserialize(&input).unwrap();

        assert_eq!(company.name, "Apple");
        assert_eq!(company.employees, 132_000);
        assert_eq!(company.website.unwrap().host_str(), Some("apple.com"));
        assert_eq!(company.address.unwrap().city, "Cupertino");
        assert_eq!(company.offices.len(), 1);
        assert_eq!(company.tags, vec!["hardware".to_string(), "software".to_string()]);
    }

    #[test]
    fn test_absent_optionals_decode_to_none() {
        let input = fields(json!({"name": "Acme", "employees": 3}));

        let company: Company = TypeRegistry::new().deserialize(&input).unwrap();

        assert_eq!(company.website, None);
        assert_eq!(company.address, None);
        assert!(company.offices.is_empty());
    }

    #[test]
    fn test_missing_required_field() {
        let input = fields(json!({"name": "Acme"}));

        let err = TypeRegistry::new().deserialize::<Company>(&input).unwrap_err();

        assert_eq!(
            err,
            DecodeError::MissingField {
                field: "employees".into(),
                type_name: "Company",
            }
        );
    }

    #[test]
    fn test_mistyped_field_is_not_coerced() {
        let input = fields(json!({"name": "Acme", "employees": "3"}));

        let err = TypeRegistry::new().deserialize::<Company>(&input).unwrap_err();

        assert_eq!(
            err,
            DecodeError::IncorrectFieldType {
                field: "employees".into(),
                expected: "int",
                found: WireKind::String,
                type_name: "Company",
            }
        );
    }

    #[test]
    fn test_present_null_on_optional_is_a_mismatch() {
        let input = fields(json!({"name": "Acme", "employees": 3, "address": null}));

        let err = TypeRegistry::new().deserialize::<Company>(&input).unwrap_err();

        assert!(matches!(
            err,
            DecodeError::IncorrectFieldType { ref field, expected: "object", found: WireKind::Null, .. }
                if field == "address"
        ));
    }

    #[test]
    fn test_nested_error_names_nested_type() {
        let input = fields(json!({
            "name": "Acme",
            "employees": 3,
            "address": {"street": "Main St"}
        }));

        let err = TypeRegistry::new().deserialize::<Company>(&input).unwrap_err();

        assert_eq!(
            err,
            DecodeError::MissingField {
                field: "city".into(),
                type_name: "Address",
            }
        );
    }

    #[test]
    fn test_array_element_error_carries_index() {
        let input = fields(json!({"name": "Acme", "employees": 3, "tags": ["ok", 7]}));

        let err = TypeRegistry::new().deserialize::<Company>(&input).unwrap_err();

        assert!(matches!(
            err,
            DecodeError::IncorrectFieldType { ref field, found: WireKind::Int, .. } if field == "tags[1]"
        ));
    }

    #[test]
    fn test_transformer_failure_becomes_formatting_failed() {
        let input = fields(json!({"name": "Acme", "employees": 3, "website": "not a url"}));

        let err = TypeRegistry::new().deserialize::<Company>(&input).unwrap_err();

        assert_eq!(err.to_string(), "'not a url' is not a valid URL");
        assert!(matches!(err, DecodeError::FormattingFailed { ref field, .. } if field == "website"));
    }

    #[test]
    fn test_encode_then_decode_preserves_company() {
        let company = Company {
            name: "Apple".into(),
            employees: 10,
            website: Some(Url::parse("https://apple.com/").unwrap()),
            address: Some(Address {
                street: "Infinite Loop".into(),
                city: "Cupertino".into(),
            }),
            offices: vec![],
            tags: vec!["a".into()],
        };

        let encoded = company.to_fields().unwrap();
        let decoded: Company = TypeRegistry::new().deserialize(&encoded).unwrap();

        assert_eq!(decoded, company);
    }

    #[test]
    fn test_encode_skips_absent_optionals() {
        let company = Company {
            name: "Acme".into(),
            employees: 1,
            website: None,
            address: None,
            offices: vec![],
            tags: vec![],
        };

        let encoded = company.to_fields().unwrap();

        assert!(!encoded.contains_key("website"));
        assert!(!encoded.contains_key("address"));
        assert_eq!(encoded["offices"], WireValue::Array(vec![]));
    }

    #[test]
    fn test_custom_transformer_both_directions() {
        let mut ctx = EncodeContext::new();
        ctx.encode_with("rank", &101, &Ordinal);
        ctx.encode_array_with("podium", &[1, 2, 3], &Ordinal);
        assert_eq!(ctx.fields()["rank"], WireValue::String("101st".into()));

        let encoded = ctx.into_fields();
        let registry = TypeRegistry::new();
        let decode = DecodeContext::new(&encoded, &registry, "Ranking");
        assert_eq!(decode.decode_with("rank", &Ordinal).unwrap(), 101);
        assert_eq!(decode.decode_array_with("podium", &Ordinal).unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_polymorphic_fields_round_trip() {
        let shelter = Shelter {
            pets: vec![
                Box::new(Dog {
                    name: "Rex".into(),
                    good: true,
                }),
                Box::new(Cat {
                    name: "Tom".into(),
                    lives: 9,
                }),
            ],
            favourite: Dog {
                name: "Fido".into(),
                good: true,
            },
        };

        let encoded = shelter.to_fields().unwrap();
        let pets = encoded["pets"].as_array().unwrap();
        assert_eq!(
            pets[1].as_object().unwrap()[DISCRIMINATOR_KEY],
            WireValue::String("Cat".into())
        );

        let decoded: Shelter = registry().deserialize(&encoded).unwrap();
        assert_eq!(decoded.pets.len(), 2);
        assert!(decoded.pets[0].is::<Dog>());
        assert_eq!(decoded.pets[1].downcast_ref::<Cat>().unwrap().lives, 9);
        assert_eq!(decoded.favourite.name, "Fido");
    }

    #[test]
    fn test_unknown_discriminator() {
        let input = fields(json!({"__type": "Parrot", "name": "Polly"}));

        let err = registry().deserialize_dyn(&input, None).unwrap_err();

        assert_eq!(err, DecodeError::UnknownDiscriminator { tag: "Parrot".into() });
    }

    #[test]
    fn test_missing_discriminator() {
        let input = fields(json!({"name": "Polly"}));

        let err = registry().deserialize_dyn(&input, None).unwrap_err();

        assert_eq!(err, DecodeError::MissingDiscriminator { key: "__type" });
    }

    #[test]
    fn test_downcast_to_wrong_type() {
        let input = fields(json!({"__type": "Cat", "name": "Tom", "lives": 3}));

        let err = registry().deserialize_as::<Dog>(&input, None).unwrap_err();

        assert_eq!(
            err,
            DecodeError::UnexpectedConcreteType {
                expected: "Dog",
                found: "Cat",
            }
        );
    }

    #[test]
    fn test_user_context_reaches_nested_decoders() {
        let input = fields(json!({"inner": {"value": 21}}));
        let factor: i64 = 2;

        let wrapper: Wrapper = TypeRegistry::new()
            .deserialize_with_context(&input, Some(&factor))
            .unwrap();

        assert_eq!(wrapper.inner.0, 42);
    }

    #[test]
    fn test_registry_reports_registrations() {
        let registry = registry();
        assert_eq!(registry.len(), 2);
        assert!(registry.is_registered("Dog"));
        assert!(!registry.is_registered("Parrot"));
        assert!(TypeRegistry::new().is_empty());
    }
}
