//! Message schemas: the ordered field lists that define each payload's wire layout.

use serde::{Serialize, Serializer};

use crate::frontend::ast::Direction;
use crate::frontend::model::{ResolvedMethod, SemanticType};
use sockidl_core::lang::primitives::PrimitiveId;
use sockidl_core::naming::{to_snake_case, to_upper_camel_case};
use sockidl_core::protocol::{MessageKind, RESPONSE_STATUS_FIELD, RETURN_VALUE_FIELD, STATUS_FIELD, message_const_name};

/// Where a schema field's value comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldRole {
    In,
    Out,
    Inout,
    /// Call-completion status, `0` on success.
    Status,
    ReturnValue,
}

impl From<Direction> for FieldRole {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::In => FieldRole::In,
            Direction::Out => FieldRole::Out,
            Direction::Inout => FieldRole::Inout,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchemaField {
    /// Field name as declared in the IDL (generated code uses its snake_case form).
    pub name: String,
    #[serde(rename = "type")]
    pub ty: SemanticType,
    pub role: FieldRole,
}

impl SchemaField {
    fn status(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ty: SemanticType::Primitive(PrimitiveId::I32),
            role: FieldRole::Status,
        }
    }
}

/// One message: its id, type name, and field order after the leading id.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MessageSchema {
    /// Generated struct name, e.g. `AddRequest`.
    pub name: String,
    /// Generated id constant, e.g. `MSG_ADD_REQ`.
    pub const_name: String,
    pub id: u32,
    #[serde(serialize_with = "serialize_kind")]
    pub kind: MessageKind,
    pub fields: Vec<SchemaField>,
}

impl MessageSchema {
    /// The status field, if this is a response.
    pub fn status_field(&self) -> Option<&SchemaField> {
        self.fields.iter().find(|f| f.role == FieldRole::Status)
    }

    pub fn return_field(&self) -> Option<&SchemaField> {
        self.fields.iter().find(|f| f.role == FieldRole::ReturnValue)
    }
}

fn serialize_kind<S: Serializer>(kind: &MessageKind, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(kind)
}

/// Request: every `in` and `inout` parameter, in declaration order.
pub fn request_schema(method: &ResolvedMethod, id: u32) -> MessageSchema {
    let fields = method
        .input_params()
        .map(|p| SchemaField {
            name: p.name.clone(),
            ty: p.ty.clone(),
            role: p.direction.into(),
        })
        .collect();
    MessageSchema {
        name: format!("{}{}", to_upper_camel_case(&method.name), MessageKind::Request.schema_suffix()),
        const_name: message_const_name(&method.name, MessageKind::Request, None),
        id,
        kind: MessageKind::Request,
        fields,
    }
}

/// Response: status, return value, then every `out`/`inout` parameter.
///
/// When an output parameter is itself named `status`, the generated status moves to a trailing
/// `response_status` field.
pub fn response_schema(method: &ResolvedMethod, id: u32) -> MessageSchema {
    let status_taken = method.output_params().any(|p| to_snake_case(&p.name) == STATUS_FIELD);

    let mut fields = Vec::new();
    if !status_taken {
        fields.push(SchemaField::status(STATUS_FIELD));
    }
    if !method.returns_void() {
        fields.push(SchemaField {
            name: RETURN_VALUE_FIELD.to_string(),
            ty: method.return_type.clone(),
            role: FieldRole::ReturnValue,
        });
    }
    fields.extend(method.output_params().map(|p| SchemaField {
        name: p.name.clone(),
        ty: p.ty.clone(),
        role: p.direction.into(),
    }));
    if status_taken {
        fields.push(SchemaField::status(RESPONSE_STATUS_FIELD));
    }

    MessageSchema {
        name: format!("{}{}", to_upper_camel_case(&method.name), MessageKind::Response.schema_suffix()),
        const_name: message_const_name(&method.name, MessageKind::Response, None),
        id,
        kind: MessageKind::Response,
        fields,
    }
}

/// Notification for an absorbed observer's method: every parameter, named after observer and method.
pub fn notification_schema(observer: &str, method: &ResolvedMethod, id: u32) -> MessageSchema {
    let fields = method
        .params
        .iter()
        .map(|p| SchemaField {
            name: p.name.clone(),
            ty: p.ty.clone(),
            role: p.direction.into(),
        })
        .collect();
    MessageSchema {
        name: format!(
            "{}{}{}",
            to_upper_camel_case(observer),
            to_upper_camel_case(&method.name),
            MessageKind::Notification.schema_suffix()
        ),
        const_name: message_const_name(&method.name, MessageKind::Notification, Some(observer)),
        id,
        kind: MessageKind::Notification,
        fields,
    }
}
