//! 处理器注册表（HandlerRegistry）
//!
//! 事件类型标签 → 处理器 的一对一映射；同一类型重复注册时后者覆盖前者。
//! 注册应在启动阶段完成，不与批处理并发进行。
//!
use super::EventHandler;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Clone, Default)]
pub struct HandlerRegistry {
    by_type: HashMap<String, Arc<dyn EventHandler>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册处理器，返回被替换的旧处理器（若有）
    pub fn register(
        &mut self,
        event_type: impl Into<String>,
        handler: Arc<dyn EventHandler>,
    ) -> Option<Arc<dyn EventHandler>> {
        self.by_type.insert(event_type.into(), handler)
    }

    pub fn get(&self, event_type: &str) -> Option<&Arc<dyn EventHandler>> {
        self.by_type.get(event_type)
    }

    pub fn contains(&self, event_type: &str) -> bool {
        self.by_type.contains_key(event_type)
    }

    /// 已注册的事件类型（无序）
    pub fn event_types(&self) -> impl Iterator<Item = &str> {
        self.by_type.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.by_type.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_type.is_empty()
    }
}

impl std::fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut handlers: Vec<(&str, &str)> = self
            .by_type
            .iter()
            .map(|(ty, h)| (ty.as_str(), h.handler_name()))
            .collect();
        handlers.sort_unstable();
        f.debug_struct("HandlerRegistry")
            .field("handlers", &handlers)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain_event::ReceivedEvent;
    use async_trait::async_trait;

    struct Named(&'static str);

    #[async_trait]
    impl EventHandler for Named {
        fn handler_name(&self) -> &str {
            self.0
        }

        async fn handle(&self, _event: &ReceivedEvent) -> anyhow::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn last_registration_wins() {
        let mut registry = HandlerRegistry::new();
        assert!(registry.is_empty());

        assert!(registry.register("UserCreatedEvent", Arc::new(Named("first"))).is_none());
        let replaced = registry
            .register("UserCreatedEvent", Arc::new(Named("second")))
            .unwrap();

        assert_eq!(replaced.handler_name(), "first");
        assert_eq!(registry.len(), 1);
        assert_eq!(
            registry.get("UserCreatedEvent").unwrap().handler_name(),
            "second"
        );
    }

    #[test]
    fn lookup_is_exact_by_type() {
        let mut registry = HandlerRegistry::new();
        registry.register("A", Arc::new(Named("a")));
        registry.register("B", Arc::new(Named("b")));

        assert!(registry.contains("A"));
        assert!(!registry.contains("a"));
        assert!(registry.get("C").is_none());

        let mut types: Vec<&str> = registry.event_types().collect();
        types.sort_unstable();
        assert_eq!(types, vec!["A", "B"]);
        assert_eq!(format!("{registry:?}"), r#"HandlerRegistry { handlers: [("A", "a"), ("B", "b")] }"#);
    }
}
