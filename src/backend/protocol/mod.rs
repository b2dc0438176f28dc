//! Protocol planning: message ids and schemas for each generated interface.
//!
//! Planning is the step between semantic analysis and code emission. It fixes everything that is observable on
//! the wire, so two programs generated from the same IDL agree on ids and layouts regardless of how the Rust
//! side is rendered.
//!
//! ## Id allocation
//!
//! Per interface, starting at the configured base:
//! 1. own methods in declaration order: a request id, then a response id right after it if the method answers
//!    (not a callback, and non-void or with `out`/`inout` parameters)
//! 2. then for each absorbed observer (classification order), each of its methods: one notification id
//!
//! ## Notes
//!
//! - A standalone pure observer plans its own methods as server pushes: its client listens for them and there
//!   is no server to dispatch them.
//! - Plans serialize with `serde`; the `plan --json` command and `protocol.json` descriptors are that
//!   serialization.

mod ids;
mod schema;

pub use ids::IdAllocator;
pub use schema::{FieldRole, MessageSchema, SchemaField, notification_schema, request_schema, response_schema};

use serde::Serialize;

use crate::backend::config::CodegenConfig;
use crate::frontend::checker::Analysis;
use crate::frontend::classify::{Classification, InterfaceRole};
use crate::frontend::diagnostics::Diagnostic;
use crate::frontend::model::{ResolvedInterface, ResolvedUnit};

/// One of the interface's own methods.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MethodPlan {
    pub name: String,
    pub is_callback: bool,
    /// Sent by the server and handled by client event handlers (callbacks, standalone observer methods).
    pub is_push: bool,
    pub request: MessageSchema,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<MessageSchema>,
}

/// A method of an absorbed observer, pushed to the owner's clients.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NotificationPlan {
    pub observer: String,
    pub method: String,
    pub message: MessageSchema,
}

/// Everything the emitter needs to know about one interface's protocol.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProtocolPlan {
    pub interface: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub module: Option<String>,
    pub role: InterfaceRole,
    pub has_server: bool,
    pub observers: Vec<String>,
    pub methods: Vec<MethodPlan>,
    pub notifications: Vec<NotificationPlan>,
}

impl ProtocolPlan {
    /// Every message, in id order.
    pub fn messages(&self) -> impl Iterator<Item = &MessageSchema> {
        self.methods
            .iter()
            .flat_map(|m| std::iter::once(&m.request).chain(m.response.as_ref()))
            .chain(self.notifications.iter().map(|n| &n.message))
    }

    /// Methods the server dispatches.
    pub fn handled_methods(&self) -> impl Iterator<Item = &MethodPlan> {
        self.methods.iter().filter(|m| !m.is_push)
    }

    /// Own methods pushed by the server.
    pub fn pushed_methods(&self) -> impl Iterator<Item = &MethodPlan> {
        self.methods.iter().filter(|m| m.is_push)
    }

    /// Ids the client's listener hands to event handlers instead of the response queue.
    pub fn push_ids(&self) -> Vec<u32> {
        self.pushed_methods()
            .map(|m| m.request.id)
            .chain(self.notifications.iter().map(|n| n.message.id))
            .collect()
    }

    /// Whether the client has any event handlers.
    pub fn has_events(&self) -> bool {
        self.methods.iter().any(|m| m.is_push) || !self.notifications.is_empty()
    }
}

/// Serialized form of a whole unit's plans (`protocol.json`).
#[derive(Debug, Clone, Serialize)]
pub struct ProtocolDescriptor<'a> {
    pub generator: &'static str,
    pub version: &'static str,
    pub message_id_base: u32,
    pub interfaces: &'a [ProtocolPlan],
}

impl<'a> ProtocolDescriptor<'a> {
    pub fn new(plans: &'a [ProtocolPlan], config: &CodegenConfig) -> Self {
        Self {
            generator: "sockidl",
            version: crate::version::SOCKIDL_VERSION,
            message_id_base: config.message_id_base,
            interfaces: plans,
        }
    }

    /// Pretty-printed JSON with a trailing newline.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        Ok(json)
    }
}

/// Plan every interface that produces output (absorbed observers are folded into their owners).
///
/// ## Errors
/// One diagnostic per interface whose ids would run past `u32::MAX`.
#[tracing::instrument(skip_all, fields(base = config.message_id_base))]
pub fn plan_unit(analysis: &Analysis, config: &CodegenConfig) -> Result<Vec<ProtocolPlan>, Vec<Diagnostic>> {
    let mut plans = Vec::new();
    let mut errors = Vec::new();
    for name in analysis.classification.emitted() {
        let Some(iface) = analysis.unit.interface(name) else {
            continue;
        };
        match plan_interface(iface, &analysis.unit, &analysis.classification, config) {
            Ok(plan) => plans.push(plan),
            Err(e) => errors.push(e),
        }
    }
    if errors.is_empty() { Ok(plans) } else { Err(errors) }
}

/// Plan one interface.
#[tracing::instrument(skip_all, fields(interface = %iface.name))]
pub fn plan_interface(
    iface: &ResolvedInterface,
    unit: &ResolvedUnit,
    classification: &Classification,
    config: &CodegenConfig,
) -> Result<ProtocolPlan, Diagnostic> {
    let role = classification.role(&iface.name).unwrap_or(InterfaceRole::Service);
    let mut ids = IdAllocator::new(config.message_id_base);
    let mut next_id = || {
        ids.allocate().ok_or_else(|| {
            Diagnostic::semantic(
                format!("interface '{}' needs message ids beyond {}", iface.name, u32::MAX),
                iface.span,
            )
            .with_hint("lower the message id base")
        })
    };

    let mut methods = Vec::with_capacity(iface.methods.len());
    for method in &iface.methods {
        let request = request_schema(method, next_id()?);
        let response = if method.has_response() {
            Some(response_schema(method, next_id()?))
        } else {
            None
        };
        methods.push(MethodPlan {
            name: method.name.clone(),
            is_callback: method.is_callback,
            is_push: method.is_callback || role != InterfaceRole::Service,
            request,
            response,
        });
    }

    let observers = classification.observers_of(&iface.name).to_vec();
    let mut notifications = Vec::new();
    for observer in observers.iter().filter_map(|name| unit.interface(name)) {
        for method in &observer.methods {
            notifications.push(NotificationPlan {
                observer: observer.name.clone(),
                method: method.name.clone(),
                message: notification_schema(&observer.name, method, next_id()?),
            });
        }
    }

    let plan = ProtocolPlan {
        interface: iface.name.clone(),
        module: iface.module.clone(),
        role,
        has_server: classification.has_server(&iface.name),
        observers,
        methods,
        notifications,
    };
    tracing::debug!(
        messages = plan.messages().count(),
        notifications = plan.notifications.len(),
        "planned interface"
    );
    Ok(plan)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::{checker, lexer, parser};

    fn plans(source: &str, config: &CodegenConfig) -> Vec<ProtocolPlan> {
        let tokens = lexer::lex(source).unwrap();
        let unit = parser::parse(&tokens).unwrap();
        let analysis = checker::check(&unit).unwrap();
        plan_unit(&analysis, config).unwrap()
    }

    fn ids(plan: &ProtocolPlan) -> Vec<(String, u32)> {
        plan.messages().map(|m| (m.const_name.clone(), m.id)).collect()
    }

    #[test]
    fn response_id_follows_its_request() {
        let plans = plans(
            "interface Calc { int add(in int a, in int b); void ping(in string who); void get(out int v); };",
            &CodegenConfig::default(),
        );
        assert_eq!(
            ids(&plans[0]),
            [
                ("MSG_ADD_REQ".to_string(), 1000),
                ("MSG_ADD_RESP".to_string(), 1001),
                ("MSG_PING_REQ".to_string(), 1002),
                ("MSG_GET_REQ".to_string(), 1003),
                ("MSG_GET_RESP".to_string(), 1004),
            ]
        );
    }

    #[test]
    fn callbacks_never_get_a_response() {
        let plans = plans(
            "interface Store { callback int changed(in string key); int size(); };",
            &CodegenConfig::default(),
        );
        let changed = &plans[0].methods[0];
        assert!(changed.is_push);
        assert!(changed.response.is_none());
        assert_eq!(plans[0].methods[1].request.id, 1001);
        assert_eq!(plans[0].push_ids(), [1000]);
    }

    #[test]
    fn absorbed_observer_methods_come_after_own_methods() {
        let plans = plans(
            "interface Sensor { void onReading(in double v); void onFault(in string why); };
             interface Hub { void attach(in Sensor s); int count(); };",
            &CodegenConfig::default(),
        );
        assert_eq!(plans.len(), 1);
        let hub = &plans[0];
        assert_eq!(hub.interface, "Hub");
        assert_eq!(hub.observers, ["Sensor".to_string()]);
        assert_eq!(
            ids(hub),
            [
                ("MSG_ATTACH_REQ".to_string(), 1000),
                ("MSG_COUNT_REQ".to_string(), 1001),
                ("MSG_COUNT_RESP".to_string(), 1002),
                ("MSG_OBSERVER_SENSOR_ON_READING_REQ".to_string(), 1003),
                ("MSG_OBSERVER_SENSOR_ON_FAULT_REQ".to_string(), 1004),
            ]
        );
        assert_eq!(hub.push_ids(), [1003, 1004]);
        assert!(hub.has_server);
    }

    #[test]
    fn standalone_observer_is_listen_only() {
        let plans = plans("interface Ticker { void tick(in long n); };", &CodegenConfig::default());
        let ticker = &plans[0];
        assert_eq!(ticker.role, InterfaceRole::PureObserver);
        assert!(!ticker.has_server);
        assert_eq!(ticker.handled_methods().count(), 0);
        assert_eq!(ticker.push_ids(), [1000]);
    }

    #[test]
    fn base_is_configurable() {
        let config = CodegenConfig::new().with_message_id_base(7);
        let plans = plans("interface Calc { int add(in int a, in int b); };", &config);
        assert_eq!(ids(&plans[0])[1], ("MSG_ADD_RESP".to_string(), 8));
    }

    #[test]
    fn id_exhaustion_is_a_diagnostic() {
        let tokens = lexer::lex("interface Calc { int add(in int a, in int b); };").unwrap();
        let unit = parser::parse(&tokens).unwrap();
        let analysis = checker::check(&unit).unwrap();
        let config = CodegenConfig::new().with_message_id_base(u32::MAX);
        let errors = plan_unit(&analysis, &config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("Calc"));
    }

    #[test]
    fn descriptor_serializes_roles_and_types() {
        let plans = plans(
            "interface Sensor { void onReading(in double v); };
             interface Hub { void attach(in Sensor s); sequence<string> names(); };",
            &CodegenConfig::default(),
        );
        let json = ProtocolDescriptor::new(&plans, &CodegenConfig::default()).to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let hub = &value["interfaces"][0];
        assert_eq!(hub["role"], "service");
        assert_eq!(hub["methods"][0]["request"]["fields"][0]["type"], "handle<Sensor>");
        assert_eq!(hub["methods"][1]["response"]["fields"][1]["type"], "sequence<string>");
        assert_eq!(hub["notifications"][0]["message"]["kind"], "notification");
        assert_eq!(value["message_id_base"], 1000);
    }
}
