//! Interactive shell over a [`PolicyDesk`].
//!
//! One line, one command, at most one request (two for a successful sign
//! in, which loads the list once). The policy list shown by `list` is the
//! local copy kept current by this session's own operations.

use std::{
    fmt::Write as _,
    io::{self, Write},
};

use anyhow::{Context, Result, anyhow, bail};
use client::{AuthMode, ClientError, ClientState, HttpPolicyApi, PolicyApi, PolicyDesk, Session};
use rpassword::prompt_password;
use shared::{
    config::ClientConfig,
    models::{Credentials, NewPolicy, Policy, PolicyId, PolicyPatch, Role},
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};

const HELP: &str = "\
Commands:
  login <username> [user|admin]      sign in (prompts for the password)
  register <username> [user|admin]  create an account and sign in
  list                               show the policies loaded this session
  add <name> <details>               add a policy (quote multi-word values)
  edit <id> [--name N] [--details D] [--owner O]
                                     change fields of a policy (admin)
  delete <id>                        delete a policy (admin)
  whoami                             show the signed-in identity
  logout                             discard the session
  help                               show this message
  quit                               leave the shell";

const ADMIN_ONLY: &str = "edit and delete are available to admins only";

const KNOWN: &[&str] = &[
    "login", "register", "list", "add", "edit", "delete", "whoami", "logout", "quit",
];

#[derive(Debug, Clone, PartialEq, Eq)]
enum ShellCommand {
    Auth {
        mode: AuthMode,
        username: String,
        role: Role,
    },
    List,
    Add(NewPolicy),
    Edit {
        id: PolicyId,
        patch: PolicyPatch,
    },
    Delete(PolicyId),
    Whoami,
    Logout,
    Help,
    Quit,
}

/// Parse one input line. Blank lines yield `None`.
fn parse_command(line: &str) -> Result<Option<ShellCommand>> {
    let Some(words) = shlex::split(line) else {
        bail!("unbalanced quotes");
    };
    let Some((head, rest)) = words.split_first() else {
        return Ok(None);
    };

    let command = match (head.as_str(), rest) {
        ("login" | "register", [username, role @ ..]) if role.len() <= 1 => {
            let mode = if head == "login" {
                AuthMode::Login
            } else {
                AuthMode::Register
            };
            let role = match role.first() {
                Some(raw) => raw
                    .parse::<Role>()
                    .map_err(|err| anyhow!("{err} {raw:?}; use user or admin"))?,
                None => Role::default(),
            };
            ShellCommand::Auth {
                mode,
                username: username.clone(),
                role,
            }
        }
        ("list" | "ls", []) => ShellCommand::List,
        ("add", [name, details]) => ShellCommand::Add(NewPolicy {
            name: name.clone(),
            details: details.clone(),
        }),
        ("edit", [id, flags @ ..]) => ShellCommand::Edit {
            id: parse_id(id)?,
            patch: parse_patch(flags)?,
        },
        ("delete" | "rm", [id]) => ShellCommand::Delete(parse_id(id)?),
        ("whoami", []) => ShellCommand::Whoami,
        ("logout", []) => ShellCommand::Logout,
        ("help" | "?", _) => ShellCommand::Help,
        ("quit" | "exit", []) => ShellCommand::Quit,
        (known, _) if KNOWN.contains(&known) => {
            bail!("wrong arguments for `{known}`; type `help` for usage")
        }
        (other, _) => bail!("unknown command `{other}`; type `help` for usage"),
    };
    Ok(Some(command))
}

fn parse_id(raw: &str) -> Result<PolicyId> {
    raw.parse()
        .with_context(|| format!("{raw:?} is not a policy id"))
}

fn parse_patch(flags: &[String]) -> Result<PolicyPatch> {
    let mut patch = PolicyPatch::default();
    let mut flags = flags.iter();
    while let Some(flag) = flags.next() {
        let slot = match flag.as_str() {
            "--name" => &mut patch.name,
            "--details" => &mut patch.details,
            "--owner" => &mut patch.owner,
            other => bail!("unknown option `{other}` for edit"),
        };
        let value = flags
            .next()
            .with_context(|| format!("{flag} needs a value"))?;
        *slot = Some(value.clone());
    }
    Ok(patch)
}

fn prompt(state: &ClientState) -> String {
    match state.session() {
        Some(session) => format!("{}@policydesk> ", session.username),
        None => "policydesk> ".to_string(),
    }
}

fn render_session(session: &Session) -> String {
    format!("Signed in as {} ({}).", session.username, session.role)
}

fn render_policies(policies: &[Policy]) -> String {
    if policies.is_empty() {
        return "No policies.".to_string();
    }

    let width = |header: &str, cell: fn(&Policy) -> usize| {
        policies.iter().map(cell).max().unwrap_or(0).max(header.len())
    };
    let id_width = width("ID", |policy| policy.id.to_string().len());
    let name_width = width("NAME", |policy| policy.name.chars().count());
    let owner_width = width("OWNER", |policy| policy.owner.chars().count());

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:>id_width$}  {:<name_width$}  {:<owner_width$}  DETAILS",
        "ID", "NAME", "OWNER"
    );
    for policy in policies {
        let _ = writeln!(
            out,
            "{:>id_width$}  {:<name_width$}  {:<owner_width$}  {}",
            policy.id, policy.name, policy.owner, policy.details
        );
    }
    out.truncate(out.trim_end().len());
    out
}

/// Runs the shell on stdin until `quit` or end of input.
///
/// # Errors
/// Returns an error if the HTTP client cannot be built or stdin/stdout fail.
pub async fn run(config: &ClientConfig) -> Result<()> {
    let http = reqwest::Client::builder()
        .timeout(config.request_timeout())
        .build()
        .context("failed to build HTTP client")?;
    let api = HttpPolicyApi::with_client(config.base_url()?.as_str(), http);
    info!(api = api.base_url(), "starting shell");
    println!(
        "PolicyDesk shell for {}. Type `help` for commands.",
        api.base_url()
    );

    let mut desk = PolicyDesk::new(api);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("{}", prompt(desk.state()));
        io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            println!();
            break;
        };
        let command = match parse_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(err) => {
                eprintln!("error: {err}");
                continue;
            }
        };
        if command == ShellCommand::Quit {
            break;
        }
        execute(&mut desk, command).await?;
    }
    Ok(())
}

async fn execute<A: PolicyApi>(desk: &mut PolicyDesk<A>, command: ShellCommand) -> Result<()> {
    debug!(?command, "executing");
    let outcome = match command {
        ShellCommand::Auth {
            mode,
            username,
            role,
        } => {
            if desk.state().is_authenticated() {
                report_error("already signed in; `logout` first");
                return Ok(());
            }
            let password = prompt_password("Password: ").context("failed to read password")?;
            let state = desk.state_mut();
            state.mode = mode;
            state.auth_form = Credentials {
                username,
                password,
                role,
            };
            desk.authenticate().await.map(|signed_in| {
                if let Some(session) = desk.state().session().filter(|_| signed_in) {
                    println!("{}", render_session(session));
                    println!("{}", render_policies(desk.state().policies()));
                }
            })
        }
        ShellCommand::List => {
            println!("{}", render_policies(desk.state().policies()));
            Ok(())
        }
        ShellCommand::Add(draft) => {
            desk.state_mut().policy_draft = draft;
            let before = desk.state().policies().len();
            desk.create_policy().await.map(|()| {
                if desk.state().policies().len() > before
                    && let Some(created) = desk.state().policies().last()
                {
                    println!("Added policy {} ({}).", created.id, created.name);
                }
            })
        }
        ShellCommand::Edit { id, patch } => {
            if let Some(refusal) = admin_refusal(desk.state()) {
                report_error(&refusal);
                return Ok(());
            }
            desk.update_policy(id, patch).await.map(|()| {
                if desk.state().last_error().is_none() {
                    println!("Updated policy {id}.");
                }
            })
        }
        ShellCommand::Delete(id) => {
            if let Some(refusal) = admin_refusal(desk.state()) {
                report_error(&refusal);
                return Ok(());
            }
            desk.delete_policy(id).await.map(|()| {
                if desk.state().last_error().is_none() {
                    println!("Deleted policy {id}.");
                }
            })
        }
        ShellCommand::Whoami => {
            match desk.state().session() {
                Some(session) => println!("{}", render_session(session)),
                None => println!("Not signed in."),
            }
            Ok(())
        }
        ShellCommand::Logout => {
            desk.logout();
            println!("Signed out.");
            Ok(())
        }
        ShellCommand::Help => {
            println!("{HELP}");
            Ok(())
        }
        ShellCommand::Quit => Ok(()),
    };

    if let Err(err) = outcome {
        report_error(&err.to_string());
    }
    if let Some(message) = desk.state().last_error() {
        report_error(message);
        desk.state_mut().dismiss_error();
    }
    Ok(())
}

/// Why an admin-only command cannot run in this state, if it cannot.
fn admin_refusal(state: &ClientState) -> Option<String> {
    if !state.is_authenticated() {
        Some(ClientError::NotAuthenticated.to_string())
    } else if !state.can_manage() {
        Some(ADMIN_ONLY.to_string())
    } else {
        None
    }
}

/// Report a failed command without leaving the shell.
fn report_error(message: &str) {
    eprintln!("error: {message}");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy(id: PolicyId, name: &str, owner: &str, details: &str) -> Policy {
        Policy {
            id,
            name: name.to_string(),
            details: details.to_string(),
            owner: owner.to_string(),
        }
    }

    #[test]
    fn test_parse_auth_commands() {
        assert_eq!(
            parse_command("login alice").unwrap(),
            Some(ShellCommand::Auth {
                mode: AuthMode::Login,
                username: "alice".into(),
                role: Role::User,
            })
        );
        assert_eq!(
            parse_command("register bob admin").unwrap(),
            Some(ShellCommand::Auth {
                mode: AuthMode::Register,
                username: "bob".into(),
                role: Role::Admin,
            })
        );
        assert!(parse_command("login carol auditor").is_err());
    }

    #[test]
    fn test_parse_add_with_quoted_values() {
        assert_eq!(
            parse_command(r#"add "Home Cover" "Fire and flood""#).unwrap(),
            Some(ShellCommand::Add(NewPolicy {
                name: "Home Cover".into(),
                details: "Fire and flood".into(),
            }))
        );
    }

    #[test]
    fn test_parse_edit_flags() {
        let parsed = parse_command("edit 7 --name Car --owner 'Jo Smith'").unwrap();
        assert_eq!(
            parsed,
            Some(ShellCommand::Edit {
                id: 7,
                patch: PolicyPatch {
                    name: Some("Car".into()),
                    details: None,
                    owner: Some("Jo Smith".into()),
                },
            })
        );
        assert!(parse_command("edit 7 --colour red").is_err());
        assert!(parse_command("edit 7 --name").is_err());
        assert!(parse_command("edit seven --name x").is_err());
    }

    #[test]
    fn test_parse_misc() {
        assert_eq!(parse_command("   ").unwrap(), None);
        assert_eq!(parse_command("delete 5").unwrap(), Some(ShellCommand::Delete(5)));
        assert_eq!(parse_command("exit").unwrap(), Some(ShellCommand::Quit));
        assert_eq!(parse_command("list").unwrap(), Some(ShellCommand::List));

        let err = parse_command("add onlyname").unwrap_err();
        assert!(err.to_string().contains("wrong arguments for `add`"));
        let err = parse_command("refresh").unwrap_err();
        assert!(err.to_string().contains("unknown command `refresh`"));
        assert!(parse_command("add \"open").is_err());
    }

    #[test]
    fn test_render_policies_table() {
        let table = render_policies(&[
            policy(12, "Car", "bob", "Full cover"),
            policy(3, "Life", "alice", "Term"),
        ]);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "ID  NAME  OWNER  DETAILS");
        assert_eq!(lines[1], "12  Car   bob    Full cover");
        assert_eq!(lines[2], " 3  Life  alice  Term");
    }

    #[test]
    fn test_render_empty_list() {
        assert_eq!(render_policies(&[]), "No policies.");
    }

    #[test]
    fn test_prompt_shows_signed_out_state() {
        assert_eq!(prompt(&ClientState::new()), "policydesk> ");
    }

    #[test]
    fn test_admin_commands_need_a_session_first() {
        let state = ClientState::new();
        assert_eq!(admin_refusal(&state).as_deref(), Some("not signed in"));
    }

    #[test]
    fn test_admin_commands_refused_for_plain_users() {
        let signed_in = |role| {
            let mut state = ClientState::new();
            state.auth_form = Credentials {
                username: "alice".to_string(),
                password: "secret".to_string(),
                role,
            };
            let request = state.begin_auth().unwrap();
            let token = shared::models::TokenResponse {
                access_token: Some("T".to_string()),
                token_type: Some("bearer".to_string()),
            };
            state.finish_auth(request, Ok(token));
            state
        };
        assert_eq!(
            admin_refusal(&signed_in(Role::User)).as_deref(),
            Some(ADMIN_ONLY)
        );
        assert_eq!(admin_refusal(&signed_in(Role::Admin)), None);
    }

    #[test]
    fn test_help_lists_every_command() {
        for command in KNOWN {
            assert!(HELP.contains(command), "help is missing {command}");
        }
    }
}
