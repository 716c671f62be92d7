use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::{MAX_DESCRIPTION_LENGTH, MAX_TITLE_LENGTH};
use crate::error::{FocusFlowError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", try_from = "String")]
pub enum Priority {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", try_from = "String")]
pub enum Status {
    Todo,
    InProgress,
    Done,
}

impl FromStr for Priority {
    type Err = FocusFlowError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "LOW" => Ok(Priority::Low),
            "MEDIUM" => Ok(Priority::Medium),
            "HIGH" => Ok(Priority::High),
            other => Err(FocusFlowError::ValidationError(format!("Unknown priority: {}", other))),
        }
    }
}

// Bodies, query strings and path segments all accept any letter case

impl TryFrom<String> for Priority {
    type Error = FocusFlowError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl TryFrom<String> for Status {
    type Error = FocusFlowError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl FromStr for Status {
    type Err = FocusFlowError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "TODO" => Ok(Status::Todo),
            "IN_PROGRESS" => Ok(Status::InProgress),
            "DONE" => Ok(Status::Done),
            other => Err(FocusFlowError::ValidationError(format!("Unknown status: {}", other))),
        }
    }
}

/// A resource with an owner fixed at creation
pub trait OwnedResource: Clone + Send + Sync {
    /// Store-assigned identifier, `None` until first saved
    fn id(&self) -> Option<i64>;

    /// Numeric id of the owning user
    fn owner_id(&self) -> i64;
}

/// Task record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Option<i64>,
    pub title: String,
    pub description: Option<String>,
    pub priority: Priority,
    pub status: Status,
    pub due_date: Option<NaiveDateTime>,
    /// Owner. Set once from the caller's identity, never from client input.
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Creates an unsaved task owned by `owner_id`
    pub fn new(request: TaskRequest, owner_id: i64) -> Self {
        let now = Utc::now();
        Self {
            id: None,
            title: request.title,
            description: request.description,
            priority: request.priority,
            status: request.status,
            due_date: request.due_date,
            user_id: owner_id,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace the mutable fields with those of `request`. The owner is left untouched.
    pub fn apply(&mut self, request: TaskRequest) {
        self.title = request.title;
        self.description = request.description;
        self.priority = request.priority;
        self.status = request.status;
        self.due_date = request.due_date;
        self.updated_at = Utc::now();
    }

    /// Due before `now` and not yet done
    pub fn is_overdue(&self, now: NaiveDateTime) -> bool {
        self.status != Status::Done && self.due_date.map_or(false, |due| due < now)
    }
}

impl OwnedResource for Task {
    fn id(&self) -> Option<i64> {
        self.id
    }

    fn owner_id(&self) -> i64 {
        self.user_id
    }
}

/// Create/update payload.
///
/// Has no owner field: any `userId` a client sends is dropped during deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub priority: Priority,
    pub status: Status,
    #[serde(default)]
    pub due_date: Option<NaiveDateTime>,
}

impl TaskRequest {
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(FocusFlowError::ValidationError("Title is required".to_string()));
        }
        if self.title.chars().count() > MAX_TITLE_LENGTH {
            return Err(FocusFlowError::ValidationError(format!(
                "Title must not exceed {} characters",
                MAX_TITLE_LENGTH
            )));
        }
        if let Some(description) = &self.description {
            if description.chars().count() > MAX_DESCRIPTION_LENGTH {
                return Err(FocusFlowError::ValidationError(format!(
                    "Description must not exceed {} characters",
                    MAX_DESCRIPTION_LENGTH
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(title: &str) -> TaskRequest {
        TaskRequest {
            title: title.to_string(),
            description: None,
            priority: Priority::Medium,
            status: Status::Todo,
            due_date: None,
        }
    }

    #[test]
    fn test_payload_owner_is_ignored() {
        let json = r#"{"title":"Write report","priority":"HIGH","status":"IN_PROGRESS","userId":999}"#;
        let request: TaskRequest = serde_json::from_str(json).unwrap();
        let task = Task::new(request, 7);

        assert_eq!(task.user_id, 7);
        assert_eq!(task.priority, Priority::High);
        assert_eq!(task.status, Status::InProgress);
    }

    #[test]
    fn test_validation() {
        assert!(request("Write report").validate().is_ok());
        assert!(request("   ").validate().is_err());
        assert!(request(&"x".repeat(256)).validate().is_err());

        let mut long_description = request("Write report");
        long_description.description = Some("y".repeat(1001));
        assert!(long_description.validate().is_err());
    }

    #[test]
    fn test_apply_keeps_owner() {
        let mut task = Task::new(request("Old"), 7);
        task.apply(request("New"));
        assert_eq!(task.title, "New");
        assert_eq!(task.user_id, 7);
        assert!(task.updated_at >= task.created_at);
    }

    #[test]
    fn test_overdue() {
        let now = Utc::now().naive_utc();
        let mut task = Task::new(request("Late"), 7);
        assert!(!task.is_overdue(now));

        task.due_date = Some(now - chrono::Duration::hours(1));
        assert!(task.is_overdue(now));

        task.status = Status::Done;
        assert!(!task.is_overdue(now));
    }

    #[test]
    fn test_parse_path_values() {
        assert_eq!("in_progress".parse::<Status>().unwrap(), Status::InProgress);
        assert_eq!("HIGH".parse::<Priority>().unwrap(), Priority::High);
        assert!("urgent".parse::<Priority>().is_err());
    }

    #[test]
    fn test_deserialize_matches_path_parsing() {
        let status: Status = serde_json::from_str(r#""in_progress""#).unwrap();
        assert_eq!(status, Status::InProgress);
        let priority: Priority = serde_json::from_str(r#""High""#).unwrap();
        assert_eq!(priority, Priority::High);
        assert!(serde_json::from_str::<Status>(r#""blocked""#).is_err());

        // Output stays upper case
        assert_eq!(serde_json::to_value(Status::InProgress).unwrap(), "IN_PROGRESS");
    }

    #[test]
    fn test_serializes_camel_case() {
        let task = Task::new(request("Write report"), 7);
        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["userId"], 7);
        assert_eq!(json["status"], "TODO");
        assert!(json.get("createdAt").is_some());
    }
}
