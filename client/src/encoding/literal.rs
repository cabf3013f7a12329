use std::fmt::Display;

use serde::{
    Serialize,
    ser::{self, Impossible},
};

use super::EncodeError;

const UNQUOTED_TOKEN: &str = "$ams_client::Unquoted";

/// Wrapper that renders its value bare in a GraphQL literal.
///
/// Unit enum variants are already rendered bare, this is for the remaining cases where
/// a token such as an enum value only exists as a string at runtime. Other serializers
/// see a plain string.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Unquoted<T>(pub T);

impl<T: Display> Serialize for Unquoted<T> {
    fn serialize<S: ser::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_newtype_struct(UNQUOTED_TOKEN, &self.0.to_string())
    }
}

/// Renders `value` as a GraphQL input-object literal, e.g. `{name:{operator:eq,value:"x"}}`.
///
/// The value must be a struct, a list or an `Option` of those. Fields are named after their
/// serde names. `None`, empty lists and objects without any rendered field are left out,
/// so a filter with nothing set renders as the empty string. Unit enum variants and
/// [`Unquoted`] values are emitted without quotes, strings are quoted and escaped.
pub fn encode_literal<T: Serialize + ?Sized>(value: &T) -> Result<String, EncodeError> {
    let literal = value.serialize(LiteralSerializer { root: true })?;
    let mut out = String::new();
    literal.render(&mut out)?;
    Ok(out)
}

#[derive(Debug, Clone, PartialEq)]
enum Literal {
    Absent,
    Raw(String),
    Str(String),
    List(Vec<Literal>),
    Object(Vec<(&'static str, Literal)>),
}

impl Literal {
    fn render(&self, out: &mut String) -> Result<(), EncodeError> {
        match self {
            Literal::Absent => {}
            Literal::Raw(token) => out.push_str(token),
            // JSON string escaping is a subset of what GraphQL string values accept
            Literal::Str(value) => {
                out.push_str(&serde_json::to_string(value).map_err(|e| EncodeError::Custom(e.to_string()))?)
            }
            Literal::List(items) => {
                out.push('[');
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    item.render(out)?;
                }
                out.push(']');
            }
            Literal::Object(fields) => {
                out.push('{');
                for (i, (name, value)) in fields.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    out.push_str(name);
                    out.push(':');
                    value.render(out)?;
                }
                out.push('}');
            }
        }
        Ok(())
    }
}

#[derive(Clone, Copy)]
struct LiteralSerializer {
    root: bool,
}

impl LiteralSerializer {
    fn nested() -> Self {
        Self { root: false }
    }

    /// Scalars are only valid as field values or list elements.
    fn scalar(self, kind: &'static str, literal: Literal) -> Result<Literal, EncodeError> {
        if self.root {
            Err(EncodeError::Unsupported(kind))
        } else {
            Ok(literal)
        }
    }

    fn integer(self, value: impl Display) -> Result<Literal, EncodeError> {
        self.scalar("integer", Literal::Raw(value.to_string()))
    }

    fn float(self, value: f64) -> Result<Literal, EncodeError> {
        if !value.is_finite() {
            return Err(EncodeError::Unsupported("non-finite float"));
        }
        self.scalar("float", Literal::Raw(value.to_string()))
    }
}

impl ser::Serializer for LiteralSerializer {
    type Ok = Literal;
    type Error = EncodeError;
    type SerializeSeq = ListLiteral;
    type SerializeTuple = Impossible<Literal, EncodeError>;
    type SerializeTupleStruct = Impossible<Literal, EncodeError>;
    type SerializeTupleVariant = Impossible<Literal, EncodeError>;
    type SerializeMap = Impossible<Literal, EncodeError>;
    type SerializeStruct = ObjectLiteral;
    type SerializeStructVariant = Impossible<Literal, EncodeError>;

    fn serialize_bool(self, v: bool) -> Result<Literal, EncodeError> {
        self.scalar("bool", Literal::Raw(v.to_string()))
    }

    fn serialize_i8(self, v: i8) -> Result<Literal, EncodeError> {
        self.integer(v)
    }

    fn serialize_i16(self, v: i16) -> Result<Literal, EncodeError> {
        self.integer(v)
    }

    fn serialize_i32(self, v: i32) -> Result<Literal, EncodeError> {
        self.integer(v)
    }

    fn serialize_i64(self, v: i64) -> Result<Literal, EncodeError> {
        self.integer(v)
    }

    fn serialize_u8(self, v: u8) -> Result<Literal, EncodeError> {
        self.integer(v)
    }

    fn serialize_u16(self, v: u16) -> Result<Literal, EncodeError> {
        self.integer(v)
    }

    fn serialize_u32(self, v: u32) -> Result<Literal, EncodeError> {
        self.integer(v)
    }

    fn serialize_u64(self, v: u64) -> Result<Literal, EncodeError> {
        self.integer(v)
    }

    fn serialize_f32(self, v: f32) -> Result<Literal, EncodeError> {
        self.float(v.into())
    }

    fn serialize_f64(self, v: f64) -> Result<Literal, EncodeError> {
        self.float(v)
    }

    fn serialize_char(self, v: char) -> Result<Literal, EncodeError> {
        self.scalar("char", Literal::Str(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<Literal, EncodeError> {
        self.scalar("string", Literal::Str(v.to_owned()))
    }

    fn serialize_bytes(self, _v: &[u8]) -> Result<Literal, EncodeError> {
        Err(EncodeError::Unsupported("bytes"))
    }

    fn serialize_none(self) -> Result<Literal, EncodeError> {
        Ok(Literal::Absent)
    }

    fn serialize_some<T>(self, value: &T) -> Result<Literal, EncodeError>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Literal, EncodeError> {
        Ok(Literal::Absent)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Literal, EncodeError> {
        Ok(Literal::Absent)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Literal, EncodeError> {
        self.scalar("enum", Literal::Raw(variant.to_owned()))
    }

    fn serialize_newtype_struct<T>(self, name: &'static str, value: &T) -> Result<Literal, EncodeError>
    where
        T: ?Sized + Serialize,
    {
        if name != UNQUOTED_TOKEN {
            return value.serialize(self);
        }

        if self.root {
            return Err(EncodeError::Unsupported("unquoted token"));
        }
        match value.serialize(Self::nested())? {
            Literal::Str(token) if token.is_empty() => Err(EncodeError::Unsupported("empty unquoted token")),
            Literal::Str(token) => Ok(Literal::Raw(token)),
            other => Ok(other),
        }
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<Literal, EncodeError>
    where
        T: ?Sized + Serialize,
    {
        Err(EncodeError::Unsupported("newtype variant"))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<ListLiteral, EncodeError> {
        Ok(ListLiteral {
            items: Vec::with_capacity(len.unwrap_or_default()),
        })
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple, EncodeError> {
        Err(EncodeError::Unsupported("tuple"))
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct, EncodeError> {
        Err(EncodeError::Unsupported("tuple struct"))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant, EncodeError> {
        Err(EncodeError::Unsupported("tuple variant"))
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap, EncodeError> {
        Err(EncodeError::Unsupported("map"))
    }

    fn serialize_struct(self, _name: &'static str, len: usize) -> Result<ObjectLiteral, EncodeError> {
        Ok(ObjectLiteral {
            fields: Vec::with_capacity(len),
        })
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant, EncodeError> {
        Err(EncodeError::Unsupported("struct variant"))
    }
}

struct ListLiteral {
    items: Vec<Literal>,
}

impl ser::SerializeSeq for ListLiteral {
    type Ok = Literal;
    type Error = EncodeError;

    fn serialize_element<T>(&mut self, value: &T) -> Result<(), EncodeError>
    where
        T: ?Sized + Serialize,
    {
        match value.serialize(LiteralSerializer::nested())? {
            Literal::Absent => {}
            literal => self.items.push(literal),
        }
        Ok(())
    }

    fn end(self) -> Result<Literal, EncodeError> {
        Ok(if self.items.is_empty() {
            Literal::Absent
        } else {
            Literal::List(self.items)
        })
    }
}

struct ObjectLiteral {
    fields: Vec<(&'static str, Literal)>,
}

impl ser::SerializeStruct for ObjectLiteral {
    type Ok = Literal;
    type Error = EncodeError;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<(), EncodeError>
    where
        T: ?Sized + Serialize,
    {
        match value.serialize(LiteralSerializer::nested())? {
            Literal::Absent => {}
            literal => self.fields.push((key, literal)),
        }
        Ok(())
    }

    fn end(self) -> Result<Literal, EncodeError> {
        Ok(if self.fields.is_empty() {
            Literal::Absent
        } else {
            Literal::Object(self.fields)
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use serde::Serialize;

    use super::*;

    #[derive(Serialize, Clone, Copy)]
    #[serde(rename_all = "camelCase")]
    enum StringOperator {
        Eq,
        Contains,
    }

    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    struct StringFilter {
        operator: StringOperator,
        value: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        case_insensitive: Option<bool>,
    }

    #[derive(Serialize, Default)]
    struct ProgramFilter {
        id: Option<StringFilter>,
        name: Option<StringFilter>,
        #[serde(rename = "AND")]
        and: Option<Vec<ProgramFilter>>,
        #[serde(rename = "OR")]
        or: Option<Vec<ProgramFilter>>,
    }

    fn eq(value: &str) -> Option<StringFilter> {
        Some(StringFilter {
            operator: StringOperator::Eq,
            value: value.into(),
            case_insensitive: None,
        })
    }

    #[test]
    fn operators_are_bare_and_values_are_quoted() {
        let filter = ProgramFilter {
            name: eq("x"),
            ..Default::default()
        };

        assert_eq!(encode_literal(&filter).unwrap(), r#"{name:{operator:eq,value:"x"}}"#);
    }

    #[test]
    fn skipped_zero_values_never_appear() {
        #[derive(Serialize)]
        struct Paging {
            #[serde(skip_serializing_if = "String::is_empty")]
            label: String,
            #[serde(skip_serializing_if = "std::ops::Not::not")]
            archived: bool,
            page: u32,
        }

        let paging = Paging {
            label: String::new(),
            archived: false,
            page: 0,
        };

        let first = encode_literal(&paging).unwrap();
        let second = encode_literal(&paging).unwrap();
        assert_eq!(first, second);
        assert_eq!(first, "{page:0}");
        assert!(!first.contains("label"));
        assert!(!first.contains("archived"));
    }

    #[test]
    fn empty_filter_encodes_to_empty_string() {
        assert_eq!(encode_literal(&ProgramFilter::default()).unwrap(), "");
        assert_eq!(encode_literal(&None::<ProgramFilter>).unwrap(), "");
    }

    #[test]
    fn combinators_render_as_lists() {
        let filter = ProgramFilter {
            or: Some(vec![
                ProgramFilter {
                    id: eq("a"),
                    ..Default::default()
                },
                ProgramFilter::default(),
                ProgramFilter {
                    name: Some(StringFilter {
                        operator: StringOperator::Contains,
                        value: "math".into(),
                        case_insensitive: Some(true),
                    }),
                    ..Default::default()
                },
            ]),
            and: Some(vec![]),
            ..Default::default()
        };

        insta::assert_snapshot!(
            encode_literal(&filter).unwrap(),
            @r#"{OR:[{id:{operator:eq,value:"a"}},{name:{operator:contains,value:"math",caseInsensitive:true}}]}"#
        );
    }

    #[test]
    fn strings_are_escaped() {
        let filter = ProgramFilter {
            name: eq("say \"hi\"\n"),
            ..Default::default()
        };

        assert_eq!(
            encode_literal(&filter).unwrap(),
            r#"{name:{operator:eq,value:"say \"hi\"\n"}}"#
        );
    }

    #[test]
    fn unquoted_wrapper_renders_bare_token() {
        #[derive(Serialize)]
        struct Sort {
            field: Unquoted<&'static str>,
            order: Unquoted<String>,
        }

        let sort = Sort {
            field: Unquoted("id"),
            order: Unquoted("ASC".to_string()),
        };

        assert_eq!(encode_literal(&sort).unwrap(), "{field:id,order:ASC}");
        assert_eq!(serde_json::to_string(&sort).unwrap(), r#"{"field":"id","order":"ASC"}"#);
    }

    #[test]
    fn empty_unquoted_token_is_rejected() {
        #[derive(Serialize)]
        struct Sort {
            field: Unquoted<&'static str>,
        }

        assert_eq!(
            encode_literal(&Sort { field: Unquoted("") }),
            Err(EncodeError::Unsupported("empty unquoted token"))
        );
    }

    #[test]
    fn unsupported_kinds_fail() {
        assert_eq!(encode_literal("plain"), Err(EncodeError::Unsupported("string")));
        assert_eq!(encode_literal(&42), Err(EncodeError::Unsupported("integer")));

        #[derive(Serialize)]
        struct WithMap {
            extra: HashMap<String, String>,
        }
        let value = WithMap {
            extra: HashMap::from([("a".to_string(), "b".to_string())]),
        };
        assert_eq!(encode_literal(&value), Err(EncodeError::Unsupported("map")));
    }
}
