//! Conversation state, separated from UI logic.
//!
//! `Conversation` owns both editable tables plus the viewer selection and
//! the warning flag. The UI never touches the tables directly: it records
//! [`EditAction`]s while drawing and hands them to [`Conversation::apply`]
//! afterwards, one at a time.

use tracing::debug;

use crate::collection::Collection;
use crate::error::EditorError;
use crate::model::{Message, MessageField, User, UserField};
use crate::seed::{self, Seed};
use crate::thread::{resolve_thread, Thread};

/// The second seeded user is the one holding the phone.
pub const DEFAULT_VIEWER: usize = 1;

/// One discrete user action against the conversation.
#[derive(Clone, Debug, PartialEq)]
pub enum EditAction {
    SetUserField { index: usize, field: UserField },
    SetUserText { index: usize, name: String, value: String },
    AppendUser,
    RemoveUser(usize),
    SetMessageField { index: usize, field: MessageField },
    SetMessageText { index: usize, name: String, value: String },
    AppendMessage,
    RemoveMessage(usize),
    SetViewer(usize),
    SetWarning(bool),
}

/// Revisions the cached thread was computed from.
type CacheKey = (u64, u64, usize);

/// Both tables are only reachable through [`Conversation::apply`], so their
/// revisions only ever grow and identify a cached thread unambiguously.
pub struct Conversation {
    users: Collection<User>,
    messages: Collection<Message>,

    /// Position of the user whose messages are drawn as "mine".
    pub viewer_index: usize,

    /// Show the "fake news" overlay. Not interpreted by the core.
    pub warning: bool,

    user_template: User,
    message_template: Message,

    cached: Option<(CacheKey, Thread)>,
}

impl Default for Conversation {
    fn default() -> Self {
        Self::seeded()
    }
}

impl Conversation {
    /// Start from the built-in example conversation.
    pub fn seeded() -> Self {
        Self::from_seed(seed::example())
    }

    pub fn from_seed(seed: Seed) -> Self {
        Self {
            users: Collection::new(seed.users),
            messages: Collection::new(seed.messages),
            viewer_index: DEFAULT_VIEWER,
            warning: false,
            user_template: seed::user_template(),
            message_template: seed::message_template(),
            cached: None,
        }
    }

    pub fn users(&self) -> &Collection<User> {
        &self.users
    }

    pub fn messages(&self) -> &Collection<Message> {
        &self.messages
    }

    /// Apply one edit. On error the state is unchanged.
    pub fn apply(&mut self, action: EditAction) -> Result<(), EditorError> {
        debug!(?action, "applying edit");
        match action {
            EditAction::SetUserField { index, field } => {
                self.users = self.users.set_field(index, field)?;
            }
            EditAction::SetUserText { index, name, value } => {
                self.users = self.users.set_named_field(index, &name, &value)?;
            }
            EditAction::AppendUser => {
                self.users = self.users.append(&self.user_template);
            }
            EditAction::RemoveUser(index) => {
                self.users = self.users.remove_at(index)?;
            }
            EditAction::SetMessageField { index, field } => {
                self.messages = self.messages.set_field(index, field)?;
            }
            EditAction::SetMessageText { index, name, value } => {
                self.messages = self.messages.set_named_field(index, &name, &value)?;
            }
            EditAction::AppendMessage => {
                self.messages = self.messages.append(&self.message_template);
            }
            EditAction::RemoveMessage(index) => {
                self.messages = self.messages.remove_at(index)?;
            }
            EditAction::SetViewer(index) => self.viewer_index = index,
            EditAction::SetWarning(on) => self.warning = on,
        }
        Ok(())
    }

    /// Apply a batch collected during one frame, returning the rejected ones.
    pub fn apply_all(
        &mut self,
        actions: impl IntoIterator<Item = EditAction>,
    ) -> Vec<(EditAction, EditorError)> {
        actions
            .into_iter()
            .filter_map(|action| {
                self.apply(action.clone())
                    .err()
                    .map(|err| (action, err))
            })
            .collect()
    }

    fn cache_key(&self) -> CacheKey {
        (self.users.revision(), self.messages.revision(), self.viewer_index)
    }

    /// The rendered conversation, recomputed only after something changed.
    pub fn thread(&mut self) -> &Thread {
        let key = self.cache_key();
        if self.cached.as_ref().is_some_and(|(cached_key, _)| *cached_key != key) {
            self.cached = None;
        }
        let (users, messages, viewer) = (&self.users, &self.messages, self.viewer_index);
        &self
            .cached
            .get_or_insert_with(|| {
                (key, resolve_thread(users.as_slice(), messages.as_slice(), viewer))
            })
            .1
    }
}
