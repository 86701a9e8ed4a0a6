use crate::model::id::UserId;

#[derive(Debug, Clone)]
pub struct CreateActivityLog {
    pub user_id: Option<UserId>,
    pub action: String,
    pub entity: String,
    pub entity_id: Option<String>,
    pub details: String,
}

impl CreateActivityLog {
    pub fn new(user_id: Option<UserId>, action: &str, entity: &str) -> Self {
        Self {
            user_id,
            action: action.into(),
            entity: entity.into(),
            entity_id: None,
            details: String::new(),
        }
    }

    pub fn with_entity_id(mut self, entity_id: impl ToString) -> Self {
        self.entity_id = Some(entity_id.to_string());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = details.into();
        self
    }
}
