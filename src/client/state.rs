//! Estado do cliente e suas transições.
//!
//! `ClientState::apply` é uma função pura: recebe o estado atual e um evento
//! e devolve o novo estado mais os efeitos (requisições, timers) que o
//! runtime deve executar. Nenhuma I/O acontece aqui.

use crate::client::api::ClientError;
use crate::models::{UserFields, UserRecord};
use std::collections::HashMap;

pub const MIN_AGE: i64 = 0;
pub const MAX_AGE: i64 = 120;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Email,
    Phone,
    Age,
    Address,
}

impl Field {
    pub const ALL: [Field; 5] = [Field::Name, Field::Email, Field::Phone, Field::Age, Field::Address];

    pub fn parse(s: &str) -> Option<Field> {
        match s.trim().to_ascii_lowercase().as_str() {
            "name" => Some(Field::Name),
            "email" => Some(Field::Email),
            "phone" => Some(Field::Phone),
            "age" => Some(Field::Age),
            "address" => Some(Field::Address),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Field::Name => "Name *",
            Field::Email => "Email *",
            Field::Phone => "Phone",
            Field::Age => "Age",
            Field::Address => "Address",
        }
    }
}

/// Valores do formulário, como texto digitado.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Draft {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub age: String,
    pub address: String,
}

impl Draft {
    pub fn from_record(record: &UserRecord) -> Self {
        Draft {
            name: record.name.clone(),
            email: record.email.clone(),
            phone: record.phone.clone().unwrap_or_default(),
            age: record.age.map(|a| a.to_string()).unwrap_or_default(),
            address: record.address.clone().unwrap_or_default(),
        }
    }

    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Email => &self.email,
            Field::Phone => &self.phone,
            Field::Age => &self.age,
            Field::Address => &self.address,
        }
    }

    pub fn set(&mut self, field: Field, value: String) {
        match field {
            Field::Name => self.name = value,
            Field::Email => self.email = value,
            Field::Phone => self.phone = value,
            Field::Age => self.age = value,
            Field::Address => self.address = value,
        }
    }

    /// Checks the draft the way the form does before submitting.
    pub fn to_fields(&self) -> Result<UserFields, String> {
        if self.name.trim().is_empty() {
            return Err("Name is required".to_string());
        }
        if self.email.trim().is_empty() {
            return Err("Email is required".to_string());
        }

        let age = match self.age.trim() {
            "" => None,
            text => match text.parse::<i64>() {
                Ok(age) if (MIN_AGE..=MAX_AGE).contains(&age) => Some(age),
                _ => return Err(format!("Age must be a whole number between {} and {}", MIN_AGE, MAX_AGE)),
            },
        };

        Ok(UserFields {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: non_blank(&self.phone),
            age,
            address: non_blank(&self.address),
        })
    }
}

fn non_blank(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// Identifica uma mensagem transitória; só o timer com o token atual a apaga.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MessageToken(u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    pub text: String,
    /// `None` para mensagens que não expiram (falha ao carregar a lista).
    pub token: Option<MessageToken>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Status {
    pub loading: bool,
    pub error: Option<Banner>,
    pub success: Option<Banner>,
}

/// Requisição que pode ter respostas concorrentes. Updates e deletes são
/// acompanhados por registro: respostas para registros diferentes nunca se
/// anulam.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum Request {
    Fetch,
    Create,
    Update(String),
    Delete(String),
}

/// Último número de sequência emitido para cada requisição pendente.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Sequences {
    issued: u64,
    pending: HashMap<Request, u64>,
}

impl Sequences {
    fn next(&mut self, request: Request) -> u64 {
        self.issued += 1;
        self.pending.insert(request, self.issued);
        self.issued
    }

    /// True when `seq` is the newest request of its kind; it stops being pending.
    fn settle(&mut self, request: Request, seq: u64) -> bool {
        if self.pending.get(&request) == Some(&seq) {
            self.pending.remove(&request);
            true
        } else {
            false
        }
    }
}

#[derive(Debug, Clone)]
pub enum Event {
    /// Carrega (ou recarrega) a lista.
    Load,
    FieldChanged(Field, String),
    Submit,
    Edit(UserRecord),
    Cancel,
    Delete { id: String, confirmed: bool },
    Loaded { seq: u64, result: Result<Vec<UserRecord>, ClientError> },
    Created { seq: u64, result: Result<UserRecord, ClientError> },
    Updated { seq: u64, id: String, result: Result<UserRecord, ClientError> },
    Deleted { seq: u64, id: String, result: Result<(), ClientError> },
    MessageExpired(MessageToken),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Fetch { seq: u64 },
    Create { seq: u64, fields: UserFields },
    Update { seq: u64, id: String, fields: UserFields },
    Delete { seq: u64, id: String },
    ExpireMessage(MessageToken),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClientState {
    pub records: Vec<UserRecord>,
    pub draft: Draft,
    pub editing_id: Option<String>,
    pub status: Status,
    latest: Sequences,
    next_token: u64,
}

impl ClientState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_editing(&self) -> bool {
        self.editing_id.is_some()
    }

    pub fn apply(mut self, event: Event) -> (ClientState, Vec<Effect>) {
        let mut effects = Vec::new();

        match event {
            Event::Load => {
                self.status.loading = true;
                let seq = self.latest.next(Request::Fetch);
                effects.push(Effect::Fetch { seq });
            }

            Event::FieldChanged(field, value) => self.draft.set(field, value),

            Event::Submit => match self.draft.to_fields() {
                Err(message) => self.flash_error(message, &mut effects),
                Ok(fields) => match self.editing_id.clone() {
                    None => {
                        let seq = self.latest.next(Request::Create);
                        effects.push(Effect::Create { seq, fields });
                    }
                    Some(id) => {
                        let seq = self.latest.next(Request::Update(id.clone()));
                        effects.push(Effect::Update { seq, id, fields });
                    }
                },
            },

            Event::Edit(record) => {
                self.draft = Draft::from_record(&record);
                self.editing_id = Some(record.id);
            }

            Event::Cancel => self.clear_form(),

            Event::Delete { id, confirmed } => {
                if confirmed {
                    let seq = self.latest.next(Request::Delete(id.clone()));
                    effects.push(Effect::Delete { seq, id });
                }
            }

            Event::Loaded { seq, result } => {
                if self.latest.settle(Request::Fetch, seq) {
                    self.status.loading = false;
                    match result {
                        Ok(records) => {
                            self.records = records;
                            self.status.error = None;
                        }
                        Err(_) => {
                            self.status.error = Some(Banner {
                                text: "Failed to fetch users".to_string(),
                                token: None,
                            });
                        }
                    }
                }
            }

            Event::Created { seq, result } => {
                let latest = self.latest.settle(Request::Create, seq);
                match result {
                    Ok(record) => {
                        // Todo create confirmado é um registro novo no servidor
                        if !self.records.iter().any(|r| r.id == record.id) {
                            self.records.insert(0, record);
                        }
                        if latest {
                            if !self.is_editing() {
                                self.draft = Draft::default();
                            }
                            self.flash_success("User created successfully!", &mut effects);
                        }
                    }
                    Err(e) if latest => {
                        let text = e.server_message().unwrap_or("Failed to create user").to_string();
                        self.flash_error(text, &mut effects);
                    }
                    Err(_) => {}
                }
            }

            Event::Updated { seq, id, result } => {
                if self.latest.settle(Request::Update(id.clone()), seq) {
                    match result {
                        Ok(record) => {
                            if let Some(slot) = self.records.iter_mut().find(|r| r.id == id) {
                                *slot = record;
                            }
                            if self.editing_id.as_deref() == Some(id.as_str()) {
                                self.clear_form();
                            }
                            self.flash_success("User updated successfully!", &mut effects);
                        }
                        Err(e) => {
                            let text = e.server_message().unwrap_or("Failed to update user").to_string();
                            self.flash_error(text, &mut effects);
                        }
                    }
                }
            }

            Event::Deleted { seq, id, result } => {
                if self.latest.settle(Request::Delete(id.clone()), seq) {
                    match result {
                        Ok(()) => {
                            self.records.retain(|r| r.id != id);
                            self.flash_success("User deleted successfully!", &mut effects);
                        }
                        Err(_) => self.flash_error("Failed to delete user", &mut effects),
                    }
                }
            }

            Event::MessageExpired(token) => {
                if self.status.success.as_ref().and_then(|b| b.token) == Some(token) {
                    self.status.success = None;
                }
                if self.status.error.as_ref().and_then(|b| b.token) == Some(token) {
                    self.status.error = None;
                }
            }
        }

        (self, effects)
    }

    fn clear_form(&mut self) {
        self.draft = Draft::default();
        self.editing_id = None;
    }

    fn issue_token(&mut self) -> MessageToken {
        self.next_token += 1;
        MessageToken(self.next_token)
    }

    fn flash_success(&mut self, text: impl Into<String>, effects: &mut Vec<Effect>) {
        let token = self.issue_token();
        self.status.success = Some(Banner {
            text: text.into(),
            token: Some(token),
        });
        self.status.error = None;
        effects.push(Effect::ExpireMessage(token));
    }

    fn flash_error(&mut self, text: impl Into<String>, effects: &mut Vec<Effect>) {
        let token = self.issue_token();
        self.status.error = Some(Banner {
            text: text.into(),
            token: Some(token),
        });
        effects.push(Effect::ExpireMessage(token));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};

    fn record(id: &str, name: &str) -> UserRecord {
        UserRecord {
            id: id.to_string(),
            name: name.to_string(),
            email: format!("{}@x.com", name.to_lowercase()),
            phone: None,
            age: Some(30),
            address: None,
            created_at: DateTime::<Utc>::from_timestamp_millis(1_700_000_000_000).unwrap(),
        }
    }

    fn server_error(message: &str) -> ClientError {
        ClientError::Server {
            status: 400,
            message: Some(message.to_string()),
        }
    }

    /// Applies an event and returns only the new state.
    fn step(state: ClientState, event: Event) -> ClientState {
        state.apply(event).0
    }

    fn fill(mut state: ClientState, name: &str, email: &str) -> ClientState {
        state = step(state, Event::FieldChanged(Field::Name, name.into()));
        step(state, Event::FieldChanged(Field::Email, email.into()))
    }

    fn seq_of(effects: &[Effect]) -> u64 {
        match effects.first() {
            Some(Effect::Fetch { seq })
            | Some(Effect::Create { seq, .. })
            | Some(Effect::Update { seq, .. })
            | Some(Effect::Delete { seq, .. }) => *seq,
            other => panic!("expected a request effect, got {:?}", other),
        }
    }

    fn expiry_token(effects: &[Effect]) -> MessageToken {
        effects
            .iter()
            .find_map(|e| match e {
                Effect::ExpireMessage(token) => Some(*token),
                _ => None,
            })
            .expect("expected an expiry effect")
    }

    #[test]
    fn load_sets_loading_and_success_replaces_records() {
        let (state, effects) = ClientState::new().apply(Event::Load);
        assert!(state.status.loading);
        assert_eq!(effects, vec![Effect::Fetch { seq: 1 }]);

        let state = step(
            state,
            Event::Loaded { seq: 1, result: Ok(vec![record("a", "Ann")]) },
        );
        assert!(!state.status.loading);
        assert_eq!(state.records.len(), 1);
        assert_eq!(state.status.error, None);
    }

    #[test]
    fn load_failure_sets_persistent_error() {
        let (state, _) = ClientState::new().apply(Event::Load);
        let (state, effects) = state.apply(Event::Loaded {
            seq: 1,
            result: Err(ClientError::Transport("refused".into())),
        });

        assert!(!state.status.loading);
        let banner = state.status.error.clone().unwrap();
        assert_eq!(banner.text, "Failed to fetch users");
        assert_eq!(banner.token, None);
        assert!(effects.is_empty());
    }

    #[test]
    fn submit_new_draft_issues_create_and_prepends_result() {
        let mut state = ClientState::new();
        state.records = vec![record("old", "Old")];
        state = fill(state, "Ann", "ann@x.com");

        let (state, effects) = state.apply(Event::Submit);
        assert_eq!(
            effects,
            vec![Effect::Create { seq: 1, fields: UserFields::new("Ann", "ann@x.com") }]
        );

        let (state, effects) = state.apply(Event::Created {
            seq: 1,
            result: Ok(record("new", "Ann")),
        });
        let ids: Vec<&str> = state.records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["new", "old"]);
        assert_eq!(state.draft, Draft::default());
        assert_eq!(state.status.success.as_ref().unwrap().text, "User created successfully!");
        assert!(matches!(effects.as_slice(), [Effect::ExpireMessage(_)]));
    }

    #[test]
    fn create_failure_keeps_draft_and_shows_server_message() {
        let state = fill(ClientState::new(), "Ann", "ann@x.com");
        let (state, _) = state.apply(Event::Submit);

        let state = step(state, Event::Created { seq: 1, result: Err(server_error("Email is required")) });
        assert_eq!(state.draft.name, "Ann");
        assert_eq!(state.status.error.unwrap().text, "Email is required");

        let state = fill(ClientState::new(), "Ann", "ann@x.com");
        let (state, _) = state.apply(Event::Submit);
        let state = step(
            state,
            Event::Created { seq: 1, result: Err(ClientError::Transport("refused".into())) },
        );
        assert_eq!(state.status.error.unwrap().text, "Failed to create user");
    }

    #[test]
    fn invalid_draft_is_rejected_locally_without_request() {
        let state = fill(ClientState::new(), "Ann", "");
        let (state, effects) = state.apply(Event::Submit);
        assert_eq!(state.status.error.as_ref().unwrap().text, "Email is required");
        assert!(matches!(effects.as_slice(), [Effect::ExpireMessage(_)]));

        let state = fill(ClientState::new(), "Ann", "a@x.com");
        let state = step(state, Event::FieldChanged(Field::Age, "121".into()));
        let (state, effects) = state.apply(Event::Submit);
        assert!(state.status.error.unwrap().text.starts_with("Age must be"));
        assert!(matches!(effects.as_slice(), [Effect::ExpireMessage(_)]));
    }

    #[test]
    fn edit_populates_draft_and_submit_issues_update() {
        let mut state = ClientState::new();
        let mut ann = record("a", "Ann");
        ann.phone = Some("555".into());
        state.records = vec![ann.clone(), record("b", "Bob")];

        let state = step(state, Event::Edit(ann));
        assert_eq!(state.editing_id.as_deref(), Some("a"));
        assert_eq!(state.draft.phone, "555");
        assert_eq!(state.draft.age, "30");
        assert_eq!(state.draft.address, "");

        let state = step(state, Event::FieldChanged(Field::Name, "Ann B".into()));
        let (state, effects) = state.apply(Event::Submit);
        match effects.as_slice() {
            [Effect::Update { seq: 1, id, fields }] => {
                assert_eq!(id, "a");
                assert_eq!(fields.name, "Ann B");
                assert_eq!(fields.phone.as_deref(), Some("555"));
            }
            other => panic!("unexpected effects {:?}", other),
        }

        let state = step(
            state,
            Event::Updated { seq: 1, id: "a".into(), result: Ok(record("a", "Ann B")) },
        );
        assert_eq!(state.records[0].name, "Ann B");
        assert_eq!(state.records[1].name, "Bob");
        assert_eq!(state.editing_id, None);
        assert_eq!(state.draft, Draft::default());
        assert_eq!(state.status.success.unwrap().text, "User updated successfully!");
    }

    #[test]
    fn update_failure_keeps_editing() {
        let state = step(ClientState::new(), Event::Edit(record("a", "Ann")));
        let (state, _) = state.apply(Event::Submit);
        let state = step(
            state,
            Event::Updated {
                seq: 1,
                id: "a".into(),
                result: Err(ClientError::Server { status: 404, message: Some("User not found".into()) }),
            },
        );
        assert_eq!(state.editing_id.as_deref(), Some("a"));
        assert_eq!(state.draft.name, "Ann");
        assert_eq!(state.status.error.unwrap().text, "User not found");
    }

    #[test]
    fn cancel_clears_draft_and_editing() {
        let state = step(ClientState::new(), Event::Edit(record("a", "Ann")));
        let state = step(state, Event::Cancel);
        assert_eq!(state.editing_id, None);
        assert_eq!(state.draft, Draft::default());
    }

    #[test]
    fn delete_requires_confirmation() {
        let (_, effects) = ClientState::new().apply(Event::Delete { id: "a".into(), confirmed: false });
        assert!(effects.is_empty());

        let mut state = ClientState::new();
        state.records = vec![record("a", "Ann"), record("b", "Bob")];
        let (state, effects) = state.apply(Event::Delete { id: "a".into(), confirmed: true });
        assert_eq!(effects, vec![Effect::Delete { seq: 1, id: "a".into() }]);

        let state = step(state, Event::Deleted { seq: 1, id: "a".into(), result: Ok(()) });
        assert_eq!(state.records.len(), 1);
        assert_eq!(state.records[0].id, "b");
        assert_eq!(state.status.success.unwrap().text, "User deleted successfully!");
    }

    #[test]
    fn delete_failure_uses_generic_message() {
        let mut state = ClientState::new();
        state.records = vec![record("a", "Ann")];
        let (state, _) = state.apply(Event::Delete { id: "a".into(), confirmed: true });
        let state = step(
            state,
            Event::Deleted { seq: 1, id: "a".into(), result: Err(server_error("User not found")) },
        );
        assert_eq!(state.records.len(), 1);
        assert_eq!(state.status.error.unwrap().text, "Failed to delete user");
    }

    #[test]
    fn stale_expiry_does_not_clear_newer_message() {
        let state = fill(ClientState::new(), "Ann", "a@x.com");
        let (state, _) = state.apply(Event::Submit);
        let (state, first) = state.apply(Event::Created { seq: 1, result: Ok(record("a", "Ann")) });
        let first_token = expiry_token(&first);

        let state = fill(state, "Bob", "b@x.com");
        let (state, _) = state.apply(Event::Submit);
        let (state, second) = state.apply(Event::Created { seq: 2, result: Ok(record("b", "Bob")) });
        let second_token = expiry_token(&second);
        assert_ne!(first_token, second_token);

        let state = step(state, Event::MessageExpired(first_token));
        assert!(state.status.success.is_some());

        let state = step(state, Event::MessageExpired(second_token));
        assert!(state.status.success.is_none());
    }

    #[test]
    fn expiry_never_clears_persistent_fetch_error() {
        let (state, _) = ClientState::new().apply(Event::Load);
        let state = step(state, Event::Loaded { seq: 1, result: Err(ClientError::Transport("x".into())) });
        let (state, effects) = fill(state, "", "").apply(Event::Submit);
        let token = expiry_token(&effects);

        // A validation error replaced the fetch error; once it expires nothing is shown
        let state = step(state, Event::MessageExpired(token));
        assert!(state.status.error.is_none());

        let (state, _) = state.apply(Event::Load);
        let state = step(state, Event::Loaded { seq: 2, result: Err(ClientError::Transport("x".into())) });
        let state = step(state, Event::MessageExpired(token));
        assert_eq!(state.status.error.unwrap().text, "Failed to fetch users");
    }

    #[test]
    fn earlier_create_is_listed_without_touching_form() {
        let state = fill(ClientState::new(), "Ann", "a@x.com");
        let (state, first) = state.apply(Event::Submit);
        let state = step(state, Event::FieldChanged(Field::Name, "Bob".into()));
        let (state, second) = state.apply(Event::Submit);
        assert_eq!(seq_of(&first), 1);
        assert_eq!(seq_of(&second), 2);

        // Older create lands first: listed, but the draft and banner wait for the newest
        let (state, effects) = state.apply(Event::Created { seq: 1, result: Ok(record("a", "Ann")) });
        assert_eq!(state.records.len(), 1);
        assert!(effects.is_empty());
        assert!(state.status.success.is_none());
        assert_eq!(state.draft.name, "Bob");

        let state = step(state, Event::Created { seq: 2, result: Ok(record("b", "Bob")) });
        let ids: Vec<&str> = state.records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
        assert_eq!(state.draft, Draft::default());
        assert_eq!(state.status.success.unwrap().text, "User created successfully!");
    }

    #[test]
    fn failed_earlier_create_is_silent_when_newer_one_is_pending() {
        let state = fill(ClientState::new(), "Ann", "a@x.com");
        let (state, _) = state.apply(Event::Submit);
        let (state, _) = state.apply(Event::Submit);

        let (state, effects) = state.apply(Event::Created {
            seq: 1,
            result: Err(ClientError::Transport("reset".into())),
        });
        assert!(effects.is_empty());
        assert!(state.status.error.is_none());
    }

    #[test]
    fn create_confirmed_while_editing_keeps_edit_form() {
        let state = fill(ClientState::new(), "Ann", "a@x.com");
        let (state, _) = state.apply(Event::Submit);
        let state = step(state, Event::Edit(record("b", "Bob")));

        let state = step(state, Event::Created { seq: 1, result: Ok(record("a", "Ann")) });
        assert_eq!(state.records[0].id, "a");
        assert_eq!(state.editing_id.as_deref(), Some("b"));
        assert_eq!(state.draft.name, "Bob");
        assert_eq!(state.status.success.unwrap().text, "User created successfully!");
    }

    #[test]
    fn quick_deletes_of_different_records_both_apply() {
        let mut state = ClientState::new();
        state.records = vec![record("a", "Ann"), record("b", "Bob"), record("c", "Cid")];

        let (state, first) = state.apply(Event::Delete { id: "a".into(), confirmed: true });
        let (state, second) = state.apply(Event::Delete { id: "b".into(), confirmed: true });

        let state = step(state, Event::Deleted { seq: seq_of(&first), id: "a".into(), result: Ok(()) });
        let state = step(state, Event::Deleted { seq: seq_of(&second), id: "b".into(), result: Ok(()) });

        let ids: Vec<&str> = state.records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["c"]);
    }

    #[test]
    fn stale_delete_of_same_record_is_dropped() {
        let mut state = ClientState::new();
        state.records = vec![record("a", "Ann")];

        let (state, first) = state.apply(Event::Delete { id: "a".into(), confirmed: true });
        let (state, second) = state.apply(Event::Delete { id: "a".into(), confirmed: true });

        let (state, effects) = state.apply(Event::Deleted {
            seq: seq_of(&first),
            id: "a".into(),
            result: Err(server_error("User not found")),
        });
        assert!(effects.is_empty());
        assert!(state.status.error.is_none());
        assert_eq!(state.records.len(), 1);

        let state = step(state, Event::Deleted { seq: seq_of(&second), id: "a".into(), result: Ok(()) });
        assert!(state.records.is_empty());
        assert_eq!(state.status.success.unwrap().text, "User deleted successfully!");
    }

    #[test]
    fn updates_of_different_records_both_apply() {
        let mut state = ClientState::new();
        state.records = vec![record("a", "Ann"), record("b", "Bob")];

        let state = step(state, Event::Edit(record("a", "Ann")));
        let state = step(state, Event::FieldChanged(Field::Name, "Ann B".into()));
        let (state, first) = state.apply(Event::Submit);

        let state = step(state, Event::Edit(record("b", "Bob")));
        let state = step(state, Event::FieldChanged(Field::Name, "Bob B".into()));
        let (state, second) = state.apply(Event::Submit);

        // The update for "a" lands while "b" is still in the form
        let state = step(
            state,
            Event::Updated { seq: seq_of(&first), id: "a".into(), result: Ok(record("a", "Ann B")) },
        );
        assert_eq!(state.records[0].name, "Ann B");
        assert_eq!(state.editing_id.as_deref(), Some("b"));
        assert_eq!(state.draft.name, "Bob B");

        let state = step(
            state,
            Event::Updated { seq: seq_of(&second), id: "b".into(), result: Ok(record("b", "Bob B")) },
        );
        assert_eq!(state.records[1].name, "Bob B");
        assert_eq!(state.editing_id, None);
    }

    #[test]
    fn stale_update_of_same_record_is_dropped() {
        let mut state = ClientState::new();
        state.records = vec![record("a", "Ann")];

        let state = step(state, Event::Edit(record("a", "Ann")));
        let state = step(state, Event::FieldChanged(Field::Name, "Ann B".into()));
        let (state, first) = state.apply(Event::Submit);
        let state = step(state, Event::FieldChanged(Field::Name, "Ann C".into()));
        let (state, second) = state.apply(Event::Submit);

        let state = step(
            state,
            Event::Updated { seq: seq_of(&second), id: "a".into(), result: Ok(record("a", "Ann C")) },
        );
        let (state, effects) = state.apply(Event::Updated {
            seq: seq_of(&first),
            id: "a".into(),
            result: Ok(record("a", "Ann B")),
        });
        assert!(effects.is_empty());
        assert_eq!(state.records[0].name, "Ann C");
    }

    #[test]
    fn stale_fetch_keeps_loading_until_latest_arrives() {
        let (state, _) = ClientState::new().apply(Event::Load);
        let (state, _) = state.apply(Event::Load);

        let state = step(state, Event::Loaded { seq: 1, result: Ok(vec![record("old", "Old")]) });
        assert!(state.status.loading);
        assert!(state.records.is_empty());

        let state = step(state, Event::Loaded { seq: 2, result: Ok(vec![record("new", "New")]) });
        assert!(!state.status.loading);
        assert_eq!(state.records[0].id, "new");
    }

    #[test]
    fn draft_to_fields_trims_and_drops_blank_optionals() {
        let draft = Draft {
            name: "  Ann ".into(),
            email: "a@x.com".into(),
            phone: " ".into(),
            age: " 42 ".into(),
            address: "1 Main St".into(),
        };
        let fields = draft.to_fields().unwrap();
        assert_eq!(fields.name, "Ann");
        assert_eq!(fields.phone, None);
        assert_eq!(fields.age, Some(42));
        assert_eq!(fields.address.as_deref(), Some("1 Main St"));
    }

    #[test]
    fn field_names_parse_case_insensitively() {
        assert_eq!(Field::parse("EMAIL"), Some(Field::Email));
        assert_eq!(Field::parse("nickname"), None);
        for field in Field::ALL {
            let mut draft = Draft::default();
            draft.set(field, "x".into());
            assert_eq!(draft.get(field), "x");
        }
    }
}
