use super::{Card, CardTransition};
use crate::config::DEFAULT_GMAIL_URL;
use crate::types::{EmailContext, ToolCall};
use std::collections::HashMap;

/// Shared display context for every card on the board.
#[derive(Debug, Clone)]
pub struct BoardContext {
    pub email: Option<EmailContext>,
    pub gmail_url: String,
}

impl Default for BoardContext {
    fn default() -> Self {
        Self {
            email: None,
            gmail_url: DEFAULT_GMAIL_URL.to_string(),
        }
    }
}

impl BoardContext {
    pub fn gmail_link(&self) -> Option<String> {
        self.email
            .as_ref()
            .filter(|email| !email.id.trim().is_empty())
            .map(|email| format!("{}{}", self.gmail_url, email.id))
    }
}

/// Cards in arrival order, keyed by tool-call id.
#[derive(Debug, Default)]
pub struct CardBoard {
    cards: Vec<Card>,
    index: HashMap<String, usize>,
    context: BoardContext,
}

impl CardBoard {
    pub fn new(context: BoardContext) -> Self {
        Self {
            cards: Vec::new(),
            index: HashMap::new(),
            context,
        }
    }

    pub fn context(&self) -> &BoardContext {
        &self.context
    }

    pub fn set_email(&mut self, email: EmailContext) {
        self.context.email = Some(email);
    }

    /// Insert a new card or apply the snapshot to the existing one.
    pub fn apply(&mut self, update: ToolCall) -> CardTransition {
        if let Some(&position) = self.index.get(&update.id) {
            if let Some(card) = self.cards.get_mut(position) {
                return card.apply(update);
            }
        }

        let card = Card::new(update);
        let opened = card.session().is_some();
        self.index.insert(card.call().id.clone(), self.cards.len());
        self.cards.push(card);
        if opened {
            CardTransition::Opened
        } else {
            CardTransition::Unchanged
        }
    }

    pub fn get(&self, position: usize) -> Option<&Card> {
        self.cards.get(position)
    }

    pub fn get_mut(&mut self, position: usize) -> Option<&mut Card> {
        self.cards.get_mut(position)
    }

    pub fn position_of(&self, call_id: &str) -> Option<usize> {
        self.index.get(call_id).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn awaiting_input(&self) -> usize {
        self.cards.iter().filter(|card| card.is_awaiting_input()).count()
    }
}
