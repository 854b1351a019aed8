use super::{
    join_recipients, parse_recipient_text, present_recipients, present_string, string_list,
    ArgDraft, DraftField,
};
use crate::types::{ProposedArgs, ToolKind};
use serde_json::{Map, Value};

/// Reply on the current thread (`write_email_response`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmailReplyDraft {
    pub recipients: Vec<String>,
    pub content: String,
}

impl ArgDraft for EmailReplyDraft {
    const KIND: ToolKind = ToolKind::WriteEmailResponse;
    const FIELDS: &'static [DraftField] = &[DraftField::Recipients, DraftField::Content];

    fn seed(args: &ProposedArgs) -> Self {
        let mut draft = Self::default();
        draft.reseed(args);
        draft
    }

    fn reseed(&mut self, args: &ProposedArgs) {
        if let Some(recipients) = present_recipients(args, "new_recipients") {
            self.recipients = recipients;
        }
        if let Some(content) = present_string(args, "content") {
            self.content = content;
        }
    }

    fn to_args(&self) -> Map<String, Value> {
        let mut args = Map::new();
        args.insert("new_recipients".to_string(), string_list(&self.recipients));
        args.insert("content".to_string(), Value::String(self.content.clone()));
        args
    }

    fn get(&self, field: DraftField) -> Option<String> {
        match field {
            DraftField::Recipients => Some(join_recipients(&self.recipients)),
            DraftField::Content => Some(self.content.clone()),
            _ => None,
        }
    }

    fn set(&mut self, field: DraftField, text: &str) -> bool {
        match field {
            DraftField::Recipients => self.recipients = parse_recipient_text(text),
            DraftField::Content => self.content = text.to_string(),
            _ => return false,
        }
        true
    }
}

/// Fresh outbound email (`start_new_email_thread`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewThreadDraft {
    pub recipients: Vec<String>,
    pub subject: String,
    pub content: String,
}

impl ArgDraft for NewThreadDraft {
    const KIND: ToolKind = ToolKind::StartNewEmailThread;
    const FIELDS: &'static [DraftField] = &[
        DraftField::Recipients,
        DraftField::Subject,
        DraftField::Content,
    ];

    fn seed(args: &ProposedArgs) -> Self {
        let mut draft = Self::default();
        draft.reseed(args);
        draft
    }

    fn reseed(&mut self, args: &ProposedArgs) {
        if let Some(recipients) = present_recipients(args, "recipients") {
            self.recipients = recipients;
        }
        if let Some(subject) = present_string(args, "subject") {
            self.subject = subject;
        }
        if let Some(content) = present_string(args, "content") {
            self.content = content;
        }
    }

    fn to_args(&self) -> Map<String, Value> {
        let mut args = Map::new();
        args.insert("recipients".to_string(), string_list(&self.recipients));
        args.insert("subject".to_string(), Value::String(self.subject.clone()));
        args.insert("content".to_string(), Value::String(self.content.clone()));
        args
    }

    fn get(&self, field: DraftField) -> Option<String> {
        match field {
            DraftField::Recipients => Some(join_recipients(&self.recipients)),
            DraftField::Subject => Some(self.subject.clone()),
            DraftField::Content => Some(self.content.clone()),
            _ => None,
        }
    }

    fn set(&mut self, field: DraftField, text: &str) -> bool {
        match field {
            DraftField::Recipients => self.recipients = parse_recipient_text(text),
            DraftField::Subject => self.subject = text.to_string(),
            DraftField::Content => self.content = text.to_string(),
            _ => return false,
        }
        true
    }
}
