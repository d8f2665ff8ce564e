use crate::error::{DomainError, DomainResult};
use crate::outbox::OutboxMessage;
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::collections::HashMap;

/// 记录主键：(聚合类型, 聚合 ID)
pub(crate) type RecordKey = (String, String);

/// 一次暂存的写入
#[derive(Debug, Clone)]
pub(crate) enum Change {
    Create { key: RecordKey, value: Value },
    Update { key: RecordKey, value: Value },
    Delete { key: RecordKey },
    Append(OutboxMessage),
    MarkProcessed { id: String, at: DateTime<Utc> },
    MarkFailed { id: String, error: String },
}

/// 已提交的数据
#[derive(Debug, Clone, Default)]
pub(crate) struct Tables {
    records: HashMap<RecordKey, Value>,
    /// 按追加顺序保存
    outbox: Vec<OutboxMessage>,
}

impl Tables {
    pub(crate) fn record(&self, key: &RecordKey) -> Option<&Value> {
        self.records.get(key)
    }

    pub(crate) fn records_of<'a>(&'a self, aggregate_type: &'a str) -> impl Iterator<Item = &'a Value> + 'a {
        self.records
            .iter()
            .filter(move |((ty, _), _)| ty == aggregate_type)
            .map(|(_, value)| value)
    }

    pub(crate) fn messages(&self) -> &[OutboxMessage] {
        &self.outbox
    }

    pub(crate) fn message(&self, id: &str) -> Option<&OutboxMessage> {
        self.outbox.iter().find(|m| m.id() == id)
    }

    pub(crate) fn message_mut(&mut self, id: &str) -> DomainResult<&mut OutboxMessage> {
        self.outbox
            .iter_mut()
            .find(|m| m.id() == id)
            .ok_or_else(|| DomainError::MessageNotFound { id: id.to_string() })
    }

    /// 未处理消息：按 `created_at` 升序，同一时间保持追加顺序
    pub(crate) fn unprocessed(&self, limit: usize) -> Vec<OutboxMessage> {
        let mut pending: Vec<&OutboxMessage> = self.outbox.iter().filter(|m| m.is_pending()).collect();
        pending.sort_by_key(|m| m.created_at());
        pending.into_iter().take(limit).cloned().collect()
    }

    pub(crate) fn append(&mut self, message: OutboxMessage) -> DomainResult<()> {
        if self.message(message.id()).is_some() {
            return Err(DomainError::DuplicateMessage {
                id: message.id().to_string(),
            });
        }
        self.outbox.push(message);
        Ok(())
    }

    pub(crate) fn apply(&mut self, change: Change) -> DomainResult<()> {
        match change {
            Change::Create { key, value } => {
                if self.records.contains_key(&key) {
                    return Err(DomainError::AlreadyExists {
                        reason: describe(&key),
                    });
                }
                self.records.insert(key, value);
            }
            Change::Update { key, value } => match self.records.get_mut(&key) {
                Some(slot) => *slot = value,
                None => {
                    return Err(DomainError::NotFound {
                        reason: describe(&key),
                    });
                }
            },
            Change::Delete { key } => {
                if self.records.remove(&key).is_none() {
                    return Err(DomainError::NotFound {
                        reason: describe(&key),
                    });
                }
            }
            Change::Append(message) => self.append(message)?,
            Change::MarkProcessed { id, at } => {
                self.message_mut(&id)?.mark_processed(at);
            }
            Change::MarkFailed { id, error } => self.message_mut(&id)?.mark_failed(error),
        }
        Ok(())
    }
}

fn describe((aggregate_type, id): &RecordKey) -> String {
    format!("{aggregate_type} {id}")
}

/// 一个事务内按顺序暂存的写入
#[derive(Debug, Default)]
pub(crate) struct ChangeSet {
    changes: Vec<Change>,
}

impl ChangeSet {
    pub(crate) fn push(&mut self, change: Change) {
        self.changes.push(change);
    }

    pub(crate) fn len(&self) -> usize {
        self.changes.len()
    }

    /// 本事务内对 `key` 的最后一次写入：`Some(None)` 表示已删除，`None` 表示未写入
    pub(crate) fn staged_record(&self, key: &RecordKey) -> Option<Option<&Value>> {
        self.changes.iter().rev().find_map(|change| match change {
            Change::Create { key: k, value } | Change::Update { key: k, value } if k == key => {
                Some(Some(value))
            }
            Change::Delete { key: k } if k == key => Some(None),
            _ => None,
        })
    }

    pub(crate) fn into_changes(self) -> Vec<Change> {
        self.changes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn key(id: &str) -> RecordKey {
        ("User".to_string(), id.to_string())
    }

    fn message(id: &str) -> OutboxMessage {
        OutboxMessage::builder()
            .id(id)
            .aggregate_id("u-1")
            .aggregate_type("User")
            .event_type("UserCreatedEvent")
            .payload("{}")
            .build()
    }

    #[test]
    fn create_update_delete_rules() {
        let mut tables = Tables::default();
        tables
            .apply(Change::Create { key: key("u-1"), value: json!({"v": 1}) })
            .unwrap();

        let dup = tables
            .apply(Change::Create { key: key("u-1"), value: json!({"v": 2}) })
            .unwrap_err();
        assert!(matches!(dup, DomainError::AlreadyExists { .. }));

        tables
            .apply(Change::Update { key: key("u-1"), value: json!({"v": 3}) })
            .unwrap();
        assert_eq!(tables.record(&key("u-1")), Some(&json!({"v": 3})));

        let missing = tables
            .apply(Change::Update { key: key("u-2"), value: json!({}) })
            .unwrap_err();
        assert!(matches!(missing, DomainError::NotFound { .. }));

        tables.apply(Change::Delete { key: key("u-1") }).unwrap();
        assert!(tables.record(&key("u-1")).is_none());
        assert!(tables.apply(Change::Delete { key: key("u-1") }).is_err());
    }

    #[test]
    fn unprocessed_orders_by_created_at_then_append_order() {
        let mut tables = Tables::default();
        let now = Utc::now();
        let later = OutboxMessage::builder()
            .id("late")
            .aggregate_id("u-1")
            .aggregate_type("User")
            .event_type("E")
            .payload("{}")
            .created_at(now + chrono::Duration::seconds(1))
            .build();
        let tie = |id: &str| {
            OutboxMessage::builder()
                .id(id)
                .aggregate_id("u-1")
                .aggregate_type("User")
                .event_type("E")
                .payload("{}")
                .created_at(now)
                .build()
        };
        tables.append(later).unwrap();
        tables.append(tie("a")).unwrap();
        tables.append(tie("b")).unwrap();

        let ids: Vec<String> = tables.unprocessed(10).iter().map(|m| m.id().to_string()).collect();
        assert_eq!(ids, vec!["a", "b", "late"]);
        assert_eq!(tables.unprocessed(1).len(), 1);
    }

    #[test]
    fn duplicate_and_unknown_messages_are_rejected() {
        let mut tables = Tables::default();
        tables.append(message("m-1")).unwrap();

        assert!(matches!(
            tables.append(message("m-1")).unwrap_err(),
            DomainError::DuplicateMessage { .. }
        ));
        assert!(matches!(
            tables
                .apply(Change::MarkFailed { id: "m-x".into(), error: "boom".into() })
                .unwrap_err(),
            DomainError::MessageNotFound { .. }
        ));
    }

    #[test]
    fn staged_record_sees_latest_write() {
        let mut changes = ChangeSet::default();
        assert!(changes.staged_record(&key("u-1")).is_none());

        changes.push(Change::Create { key: key("u-1"), value: json!(1) });
        changes.push(Change::Update { key: key("u-1"), value: json!(2) });
        assert_eq!(changes.staged_record(&key("u-1")), Some(Some(&json!(2))));

        changes.push(Change::Delete { key: key("u-1") });
        assert_eq!(changes.staged_record(&key("u-1")), Some(None));
        assert_eq!(changes.len(), 3);
    }
}
