//! Executes parsed commands against a [`PermissionEngine`].

use crate::command_tree::{Action, CommandTree, Invocation};
use crate::error::CommandError;
use anyhow::Result;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, info};
use warrant_runtime::{Inheritance, PermissionEngine, PermissionStore};
use warrant_types::{Subject, UserId};

/// Who issues the commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Actor {
    /// Local operator, every requirement passes.
    Console,
    /// A user, authorized through the engine with an operator-level fallback.
    User { id: UserId, op_level: u8 },
}

pub struct Shell<S> {
    engine: PermissionEngine<S>,
    commands: CommandTree,
    actor: Actor,
}

impl<S: PermissionStore> Shell<S> {
    pub fn new(engine: PermissionEngine<S>, commands: CommandTree, actor: Actor) -> Self {
        Self {
            engine,
            commands,
            actor,
        }
    }

    /// Parses, authorizes and runs one command. Returns the text to print.
    ///
    /// # Errors
    ///
    /// A [`CommandError`] for malformed or unauthorized input, or the
    /// engine's error.
    pub async fn execute<W: AsRef<str>>(&self, words: &[W]) -> Result<String> {
        let invocation = self.commands.parse(words)?;
        self.authorize(&invocation).await?;
        debug!(action = ?invocation.action, "Executing command");
        self.run(&invocation).await
    }

    /// Runs one command per input line until EOF or `q`/`quit`.
    ///
    /// Blank lines and `#` comments are skipped. Errors are printed to
    /// stderr and do not stop the loop. Returns the number of failed lines.
    ///
    /// # Errors
    ///
    /// Only a failure to read the input.
    pub async fn run_lines<R: AsyncBufRead + Unpin>(&self, input: R) -> Result<usize> {
        let mut lines = input.lines();
        let mut failures = 0;

        while let Some(line) = lines.next_line().await? {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if matches!(line, "q" | "quit") {
                info!("Quit requested");
                break;
            }

            let words: Vec<&str> = line.split_whitespace().collect();
            match self.execute(&words).await {
                Ok(output) => println!("{output}"),
                Err(e) => {
                    failures += 1;
                    eprintln!("Error: {e}");
                }
            }
        }

        Ok(failures)
    }

    async fn authorize(&self, invocation: &Invocation) -> Result<()> {
        let Actor::User { id, op_level } = self.actor else {
            return Ok(());
        };
        let subject = Subject::User(id);

        for requirement in &invocation.requirements {
            let value = self.engine.check(&subject, requirement.permission).await?;
            if !value.is_granted() && op_level < requirement.fallback_level {
                debug!(
                    user = %id,
                    permission = requirement.permission,
                    op_level,
                    "Command denied"
                );
                return Err(CommandError::PermissionDenied(requirement.permission).into());
            }
        }
        Ok(())
    }

    async fn run(&self, inv: &Invocation) -> Result<String> {
        let engine = &self.engine;
        let output = match inv.action {
            Action::CreateGroup => {
                let group = inv.group("name")?;
                engine.create_group(&group).await?;
                format!("Group '{group}' created.")
            }
            Action::DeleteGroup => {
                let group = inv.group("name")?;
                engine.delete_group(&group).await?;
                format!("Group '{group}' deleted.")
            }
            Action::AddMember => {
                let (user, group) = (inv.user("user")?, inv.group("group")?);
                engine.add_member(&group, &user).await?;
                format!("User '{user}' added to group '{group}'.")
            }
            Action::RemoveMember => {
                let (user, group) = (inv.user("user")?, inv.group("group")?);
                engine.remove_member(&group, &user).await?;
                format!("User '{user}' removed from group '{group}'.")
            }
            Action::Members => {
                let group = inv.group("group")?;
                let members = engine.members(&group).await?;
                if members.is_empty() {
                    format!("No members in group '{group}' or group does not exist.")
                } else {
                    bullet_list(&format!("Members of '{group}':"), members)
                }
            }
            Action::ListGroups => {
                let groups = engine.list_groups().await?;
                if groups.is_empty() {
                    "No groups.".to_string()
                } else {
                    bullet_list("Groups:", groups)
                }
            }
            Action::GrantGroup | Action::GrantUser => {
                let subject = target(inv)?;
                engine
                    .grant(&subject, inv.permission("permission")?.as_str())
                    .await?;
                "Permission granted".to_string()
            }
            Action::RevokeGroup | Action::RevokeUser => {
                let subject = target(inv)?;
                let permission = inv.permission("permission")?;
                if engine.revoke(&subject, permission.as_str()).await? {
                    "Permission revoked".to_string()
                } else {
                    format!("Permission '{permission}' was not granted")
                }
            }
            Action::ListGroupPermissions | Action::ListUserPermissions => {
                let subject = target(inv)?;
                let granted = engine
                    .list_granted(&subject, Inheritance::Inherited)
                    .await?;
                bullet_list("Permissions:", granted)
            }
            Action::CheckUser | Action::CheckGroup => {
                let subject = target(inv)?;
                let permission = inv.permission("permission")?;
                let value = engine.check(&subject, permission.as_str()).await?;
                format!("{subject} {permission}: {value}")
            }
            Action::Connect => {
                let user = inv.user("user")?;
                if engine.on_connect(&user).await? {
                    format!("User '{user}' joined group 'everyone'.")
                } else {
                    format!("User '{user}' connected.")
                }
            }
            Action::Suggest => {
                let known = engine.suggestions(inv.word("prefix").unwrap_or(""));
                if known.is_empty() {
                    "No known permissions.".to_string()
                } else {
                    known.join("\n")
                }
            }
        };
        Ok(output)
    }
}

/// Subject named by a `<group>` or `<user>` argument.
fn target(inv: &Invocation) -> Result<Subject, CommandError> {
    match inv.action {
        Action::GrantGroup
        | Action::RevokeGroup
        | Action::ListGroupPermissions
        | Action::CheckGroup => inv.group("group").map(Subject::Group),
        _ => inv.user("user").map(Subject::User),
    }
}

fn bullet_list<T: std::fmt::Display>(header: &str, items: impl IntoIterator<Item = T>) -> String {
    let mut out = header.to_string();
    for item in items {
        out.push_str(&format!("\n- {item}"));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command_tree::warrant_commands;
    use warrant_runtime::MemoryStore;
    use warrant_types::GroupName;

    fn shell(actor: Actor) -> Shell<MemoryStore> {
        Shell::new(
            PermissionEngine::with_store(MemoryStore::new()),
            warrant_commands(),
            actor,
        )
    }

    async fn run(shell: &Shell<MemoryStore>, line: &str) -> Result<String> {
        let words: Vec<&str> = line.split_whitespace().collect();
        shell.execute(&words).await
    }

    #[tokio::test]
    async fn console_administers_groups() {
        let shell = shell(Actor::Console);
        let user = UserId::new();

        assert_eq!(
            run(&shell, "group create admins").await.expect("create"),
            "Group 'admins' created."
        );
        assert_eq!(
            run(&shell, "permission group admins grant server.stop")
                .await
                .expect("grant"),
            "Permission granted"
        );
        assert_eq!(
            run(&shell, &format!("group add_user {user} admins"))
                .await
                .expect("add"),
            format!("User '{user}' added to group 'admins'.")
        );
        assert_eq!(
            run(&shell, &format!("check user {user} server.stop"))
                .await
                .expect("check"),
            format!("user:{user} server.stop: granted")
        );
        assert_eq!(
            run(&shell, &format!("permission player {user} list"))
                .await
                .expect("list"),
            "Permissions:\n- server.stop\n- server"
        );
        assert_eq!(
            run(&shell, "group members admins").await.expect("members"),
            format!("Members of 'admins':\n- {user}")
        );
    }

    #[tokio::test]
    async fn revoke_reports_absent_grant() {
        let shell = shell(Actor::Console);
        assert_eq!(
            run(&shell, "permission group vip revoke lounge")
                .await
                .expect("revoke"),
            "Permission 'lounge' was not granted"
        );
    }

    #[tokio::test]
    async fn engine_errors_surface() {
        let shell = shell(Actor::Console);
        let user = UserId::new();

        let err = run(&shell, &format!("group remove_user {user} everyone"))
            .await
            .expect_err("everyone is protected");
        assert_eq!(err.to_string(), "cannot remove user from group 'everyone'");

        let err = run(&shell, "group delete ghosts")
            .await
            .expect_err("missing group");
        assert_eq!(err.to_string(), "group 'ghosts' does not exist");
    }

    #[tokio::test]
    async fn user_without_level_is_denied() {
        let shell = shell(Actor::User {
            id: UserId::new(),
            op_level: 0,
        });
        let err = run(&shell, "group create mods").await.expect_err("denied");
        assert!(matches!(
            err.downcast_ref::<CommandError>(),
            Some(CommandError::PermissionDenied("permissions.groups.?"))
        ));
    }

    #[tokio::test]
    async fn op_level_stands_in_for_permission() {
        let shell = shell(Actor::User {
            id: UserId::new(),
            op_level: 3,
        });
        run(&shell, "group list").await.expect("level 3 may list");
        let err = run(&shell, "group create mods")
            .await
            .expect_err("create needs level 4");
        assert!(matches!(
            err.downcast_ref::<CommandError>(),
            Some(CommandError::PermissionDenied("permissions.groups.create"))
        ));
    }

    #[tokio::test]
    async fn granted_permissions_authorize_user() {
        let admin = UserId::new();
        let shell = shell(Actor::User {
            id: admin,
            op_level: 0,
        });
        shell
            .engine
            .grant(&Subject::User(admin), "permissions.groups.*")
            .await
            .expect("grant");

        run(&shell, "group create mods").await.expect("authorized");
        assert_eq!(
            shell.engine.list_groups().await.expect("groups"),
            vec![GroupName::new("mods").expect("valid")]
        );
    }

    #[tokio::test]
    async fn run_lines_counts_failures() {
        let shell = shell(Actor::Console);
        let input = b"# setup\ngroup create a\n\ngroup create a\nq\ngroup create b\n";

        let failures = shell.run_lines(&input[..]).await.expect("read input");

        assert_eq!(failures, 1);
        assert_eq!(
            shell.engine.list_groups().await.expect("groups"),
            vec![GroupName::new("a").expect("valid")]
        );
    }
}
