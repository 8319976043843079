use crate::client::state::{ClientState, Field};
use std::fmt::Write;

pub const TITLE: &str = "User Management System";
pub const SUBTITLE: &str = "Create, Read, Update, and Delete users with ease";

/// Renderiza o estado completo: cabeçalho, alertas, formulário e lista.
pub fn render(state: &ClientState) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{}", TITLE);
    let _ = writeln!(out, "{}", SUBTITLE);
    let _ = writeln!(out);

    if let Some(success) = &state.status.success {
        let _ = writeln!(out, "[OK] {}", success.text);
    }
    if let Some(error) = &state.status.error {
        let _ = writeln!(out, "[ERROR] {}", error.text);
    }

    render_form(state, &mut out);
    let _ = writeln!(out);
    render_list(state, &mut out);

    out
}

fn render_form(state: &ClientState, out: &mut String) {
    let heading = if state.is_editing() { "Edit User" } else { "Add New User" };
    let _ = writeln!(out, "== {} ==", heading);

    for field in Field::ALL {
        let _ = writeln!(out, "  {:<10} {}", field.label(), state.draft.get(field));
    }

    let actions = if state.is_editing() {
        "[submit] Update User   [cancel] Cancel"
    } else {
        "[submit] Add User"
    };
    let _ = writeln!(out, "  {}", actions);
}

fn render_list(state: &ClientState, out: &mut String) {
    let _ = writeln!(out, "== Users List ==");

    if state.status.loading {
        let _ = writeln!(out, "  Loading users...");
        return;
    }

    if state.records.is_empty() {
        let _ = writeln!(out, "  No users found");
        let _ = writeln!(out, "  Add your first user using the form above!");
        return;
    }

    for (index, user) in state.records.iter().enumerate() {
        let _ = writeln!(out, "  {}. {}", index + 1, user.name);
        let _ = writeln!(out, "     Email: {}", user.email);
        if let Some(phone) = &user.phone {
            let _ = writeln!(out, "     Phone: {}", phone);
        }
        if let Some(age) = user.age {
            let _ = writeln!(out, "     Age: {}", age);
        }
        if let Some(address) = &user.address {
            let _ = writeln!(out, "     Address: {}", address);
        }
        let _ = writeln!(out, "     Created: {}", user.created_at.format("%Y-%m-%d"));
        let _ = writeln!(out, "     [edit {0}] Edit   [delete {0}] Delete", index + 1);
    }
}
