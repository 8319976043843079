// Console da API de usuários: formulário + lista no terminal.
//
// Uso: API_BASE_URL=http://localhost:5000/api/users cargo run --bin console

use std::io::Write;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::watch;
use user_crud::{
    client::{view, ClientRuntime, ClientState, Event, Field, HttpUsersApi},
    config::{self, ConsoleConfig},
    models::UserRecord,
};

const HELP: &str = "\
Commands:
  set <field> <value>   edit the form (name, email, phone, age, address)
  submit                add the user, or save the edit in progress
  edit <n>              load user #n into the form
  delete <n>            delete user #n (asks for confirmation)
  cancel                clear the form and leave edit mode
  reload                fetch the list again
  help                  show this text
  quit                  exit";

#[derive(Debug, PartialEq)]
enum Command {
    Set(Field, String),
    Submit,
    Edit(usize),
    Delete(usize),
    Cancel,
    Reload,
    Help,
    Quit,
}

fn parse_command(line: &str) -> Result<Command, String> {
    let line = line.trim();
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    let position = |rest: &str| -> Result<usize, String> {
        match rest.parse::<usize>() {
            Ok(n) if n > 0 => Ok(n),
            _ => Err(format!("Expected a user number, got '{}'", rest)),
        }
    };

    match verb.to_ascii_lowercase().as_str() {
        "set" => {
            let (name, value) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
            let field = Field::parse(name).ok_or_else(|| format!("Unknown field '{}'", name))?;
            Ok(Command::Set(field, value.trim().to_string()))
        }
        "submit" => Ok(Command::Submit),
        "edit" => position(rest).map(Command::Edit),
        "delete" => position(rest).map(Command::Delete),
        "cancel" => Ok(Command::Cancel),
        "reload" => Ok(Command::Reload),
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" => Ok(Command::Quit),
        "" => Err(String::new()),
        other => Err(format!("Unknown command '{}' (try 'help')", other)),
    }
}

fn record_at(states: &watch::Receiver<ClientState>, position: usize) -> Option<UserRecord> {
    states.borrow().records.get(position - 1).cloned()
}

fn prompt() {
    print!("> ");
    let _ = std::io::stdout().flush();
}

#[tokio::main]
async fn main() {
    config::load_env_files();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("warn"));

    let config = match ConsoleConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {}", e);
            std::process::exit(2);
        }
    };

    log::info!("🌐 Using API at {}", config.api_base_url);

    let api = Arc::new(HttpUsersApi::new(config.api_base_url.clone()));
    let runtime = ClientRuntime::new(api, config.message_ttl);
    let handle = runtime.handle();
    let states = runtime.subscribe();

    // View: re-renderiza a cada novo estado publicado
    let mut render_rx = states.clone();
    tokio::spawn(async move {
        while render_rx.changed().await.is_ok() {
            let text = view::render(&render_rx.borrow_and_update());
            println!("\n{}", text);
            prompt();
        }
    });

    tokio::spawn(runtime.run());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Ok(Some(line)) = lines.next_line().await {
        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(message) => {
                if !message.is_empty() {
                    println!("{}", message);
                }
                prompt();
                continue;
            }
        };

        let event = match command {
            Command::Quit => break,
            Command::Help => {
                println!("{}", HELP);
                prompt();
                continue;
            }
            Command::Set(field, value) => Event::FieldChanged(field, value),
            Command::Submit => Event::Submit,
            Command::Cancel => Event::Cancel,
            Command::Reload => Event::Load,
            Command::Edit(n) => match record_at(&states, n) {
                Some(record) => Event::Edit(record),
                None => {
                    println!("No user #{}", n);
                    prompt();
                    continue;
                }
            },
            Command::Delete(n) => {
                let Some(record) = record_at(&states, n) else {
                    println!("No user #{}", n);
                    prompt();
                    continue;
                };
                print!("Are you sure you want to delete {}? [y/N] ", record.name);
                let _ = std::io::stdout().flush();
                let answer = lines.next_line().await.ok().flatten().unwrap_or_default();
                let confirmed = matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes");
                Event::Delete {
                    id: record.id,
                    confirmed,
                }
            }
        };

        if !handle.send(event) {
            break;
        }
    }
}
