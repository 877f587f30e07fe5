//! Administrative command tree.
//!
//! Commands are plain data: literal nodes with positional arguments, an
//! optional required permission and an optional [`Action`]. Parsing a
//! line walks the tree and yields an [`Invocation`] holding the action,
//! the typed arguments, and every requirement along the matched path.
//!
//! ```text
//! group
//!   create <name> | delete <name> | list
//!   add_user <user> <group> | remove_user <user> <group> | members <group>
//! permission
//!   group <group>  grant <permission> | revoke <permission> | list
//!   player <user>  grant <permission> | revoke <permission> | list
//! check user <user> <permission> | check group <group> <permission>
//! connect <user>
//! suggest [prefix]
//! ```

use crate::error::CommandError;
use warrant_auth::{matcher::is_existence_query, PermissionString};
use warrant_types::{GroupName, UserId};

/// Permission a node demands, with the operator level that stands in
/// for it when the permission is not granted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Requirement {
    pub permission: &'static str,
    pub fallback_level: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgKind {
    User,
    Group,
    Permission,
    /// Free text, may be omitted.
    OptionalWord,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArgSpec {
    pub name: &'static str,
    pub kind: ArgKind,
}

/// Handler tag of an executable node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    CreateGroup,
    DeleteGroup,
    AddMember,
    RemoveMember,
    Members,
    ListGroups,
    GrantGroup,
    RevokeGroup,
    ListGroupPermissions,
    GrantUser,
    RevokeUser,
    ListUserPermissions,
    CheckUser,
    CheckGroup,
    Connect,
    Suggest,
}

/// Parsed argument value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgValue {
    User(UserId),
    Group(GroupName),
    Permission(PermissionString),
    Word(String),
}

/// One literal of the tree.
#[derive(Debug, Clone)]
pub struct CommandNode {
    name: &'static str,
    requirement: Option<Requirement>,
    args: Vec<ArgSpec>,
    children: Vec<CommandNode>,
    action: Option<Action>,
}

impl CommandNode {
    #[must_use]
    pub fn literal(name: &'static str) -> Self {
        Self {
            name,
            requirement: None,
            args: Vec::new(),
            children: Vec::new(),
            action: None,
        }
    }

    #[must_use]
    pub fn requires(mut self, permission: &'static str, fallback_level: u8) -> Self {
        self.requirement = Some(Requirement {
            permission,
            fallback_level,
        });
        self
    }

    /// Appends a positional argument consumed right after the literal.
    #[must_use]
    pub fn arg(mut self, name: &'static str, kind: ArgKind) -> Self {
        self.args.push(ArgSpec { name, kind });
        self
    }

    #[must_use]
    pub fn then(mut self, child: CommandNode) -> Self {
        self.children.push(child);
        self
    }

    #[must_use]
    pub fn executes(mut self, action: Action) -> Self {
        self.action = Some(action);
        self
    }
}

/// Result of a successful parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub action: Action,
    /// Requirements of the matched path, outermost first.
    pub requirements: Vec<Requirement>,
    args: Vec<(&'static str, ArgValue)>,
}

impl Invocation {
    fn get(&self, name: &'static str) -> Option<&ArgValue> {
        self.args
            .iter()
            .find(|(arg, _)| *arg == name)
            .map(|(_, value)| value)
    }

    /// # Errors
    ///
    /// [`CommandError::MissingArgument`] if no user argument is named `name`.
    pub fn user(&self, name: &'static str) -> Result<UserId, CommandError> {
        match self.get(name) {
            Some(ArgValue::User(user)) => Ok(*user),
            _ => Err(CommandError::MissingArgument(name)),
        }
    }

    /// # Errors
    ///
    /// [`CommandError::MissingArgument`] if no group argument is named `name`.
    pub fn group(&self, name: &'static str) -> Result<GroupName, CommandError> {
        match self.get(name) {
            Some(ArgValue::Group(group)) => Ok(group.clone()),
            _ => Err(CommandError::MissingArgument(name)),
        }
    }

    /// # Errors
    ///
    /// [`CommandError::MissingArgument`] if no permission argument is named `name`.
    pub fn permission(&self, name: &'static str) -> Result<&PermissionString, CommandError> {
        match self.get(name) {
            Some(ArgValue::Permission(permission)) => Ok(permission),
            _ => Err(CommandError::MissingArgument(name)),
        }
    }

    /// Optional free-text argument.
    #[must_use]
    pub fn word(&self, name: &'static str) -> Option<&str> {
        match self.get(name) {
            Some(ArgValue::Word(word)) => Some(word),
            _ => None,
        }
    }
}

/// The set of top-level commands.
#[derive(Debug, Clone, Default)]
pub struct CommandTree {
    roots: Vec<CommandNode>,
}

impl CommandTree {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn command(mut self, node: CommandNode) -> Self {
        self.roots.push(node);
        self
    }

    /// Every concrete permission demanded somewhere in the tree, in
    /// declaration order. Existence queries are left out.
    #[must_use]
    pub fn required_permissions(&self) -> Vec<&'static str> {
        let mut out = Vec::new();
        let mut stack: Vec<&CommandNode> = self.roots.iter().rev().collect();
        while let Some(node) = stack.pop() {
            if let Some(req) = node.requirement {
                if !is_existence_query(req.permission) {
                    out.push(req.permission);
                }
            }
            stack.extend(node.children.iter().rev());
        }
        out
    }

    /// Matches `words` against the tree.
    ///
    /// # Errors
    ///
    /// A [`CommandError`] naming the first word that does not fit.
    pub fn parse<S: AsRef<str>>(&self, words: &[S]) -> Result<Invocation, CommandError> {
        let mut words = words.iter().map(S::as_ref).peekable();
        let mut level: &[CommandNode] = &self.roots;
        let mut matched: Vec<&'static str> = Vec::new();
        let mut requirements = Vec::new();
        let mut args = Vec::new();

        loop {
            let Some(word) = words.next() else {
                return Err(CommandError::Incomplete {
                    command: matched.join(" "),
                    expected: names(level),
                });
            };
            let Some(node) = level.iter().find(|n| n.name == word) else {
                return Err(CommandError::UnknownCommand {
                    word: word.to_string(),
                    expected: names(level),
                });
            };
            matched.push(node.name);
            requirements.extend(node.requirement);

            for spec in &node.args {
                match words.next() {
                    Some(raw) => args.push((spec.name, parse_arg(spec, raw)?)),
                    None if spec.kind == ArgKind::OptionalWord => {}
                    None => return Err(CommandError::MissingArgument(spec.name)),
                }
            }

            match (words.peek(), node.action) {
                (None, Some(action)) => {
                    return Ok(Invocation {
                        action,
                        requirements,
                        args,
                    })
                }
                (Some(extra), _) if node.children.is_empty() => {
                    return Err(CommandError::UnexpectedArgument((*extra).to_string()));
                }
                _ => level = node.children.as_slice(),
            }
        }
    }
}

fn names(level: &[CommandNode]) -> String {
    level.iter().map(|n| n.name).collect::<Vec<_>>().join(", ")
}

fn parse_arg(spec: &ArgSpec, raw: &str) -> Result<ArgValue, CommandError> {
    let invalid = |source| CommandError::InvalidId {
        name: spec.name,
        source,
    };
    match spec.kind {
        ArgKind::User => raw.parse().map(ArgValue::User).map_err(invalid),
        ArgKind::Group => GroupName::new(raw).map(ArgValue::Group).map_err(invalid),
        ArgKind::Permission => Ok(ArgValue::Permission(PermissionString::parse(raw)?)),
        ArgKind::OptionalWord => Ok(ArgValue::Word(raw.to_string())),
    }
}

/// `permission group|player <target> grant|revoke|list`, guarded by
/// `[scope, grant, revoke, list]`.
fn edit_target(
    name: &'static str,
    arg: ArgSpec,
    permissions: [&'static str; 4],
    actions: [Action; 3],
) -> CommandNode {
    let [scope, grant, revoke, list] = permissions;
    let [grant_action, revoke_action, list_action] = actions;
    CommandNode::literal(name)
        .requires(scope, 4)
        .arg(arg.name, arg.kind)
        .then(
            CommandNode::literal("grant")
                .requires(grant, 4)
                .arg("permission", ArgKind::Permission)
                .executes(grant_action),
        )
        .then(
            CommandNode::literal("revoke")
                .requires(revoke, 4)
                .arg("permission", ArgKind::Permission)
                .executes(revoke_action),
        )
        .then(
            CommandNode::literal("list")
                .requires(list, 4)
                .executes(list_action),
        )
}

/// The `warrant` command set.
#[must_use]
pub fn warrant_commands() -> CommandTree {
    let group = CommandNode::literal("group")
        .requires("permissions.groups.?", 3)
        .then(
            CommandNode::literal("create")
                .requires("permissions.groups.create", 4)
                .arg("name", ArgKind::Group)
                .executes(Action::CreateGroup),
        )
        .then(
            CommandNode::literal("delete")
                .requires("permissions.groups.delete", 4)
                .arg("name", ArgKind::Group)
                .executes(Action::DeleteGroup),
        )
        .then(
            CommandNode::literal("add_user")
                .requires("permissions.groups.add_user", 3)
                .arg("user", ArgKind::User)
                .arg("group", ArgKind::Group)
                .executes(Action::AddMember),
        )
        .then(
            CommandNode::literal("remove_user")
                .requires("permissions.groups.remove_user", 3)
                .arg("user", ArgKind::User)
                .arg("group", ArgKind::Group)
                .executes(Action::RemoveMember),
        )
        .then(
            CommandNode::literal("members")
                .requires("permissions.groups.members", 3)
                .arg("group", ArgKind::Group)
                .executes(Action::Members),
        )
        .then(
            CommandNode::literal("list")
                .requires("permissions.groups.list", 3)
                .executes(Action::ListGroups),
        );

    let permission = CommandNode::literal("permission")
        .requires("permissions.edit.?", 4)
        .then(edit_target(
            "group",
            ArgSpec {
                name: "group",
                kind: ArgKind::Group,
            },
            [
                "permissions.edit.group.?",
                "permissions.edit.group.grant",
                "permissions.edit.group.revoke",
                "permissions.edit.group.list",
            ],
            [
                Action::GrantGroup,
                Action::RevokeGroup,
                Action::ListGroupPermissions,
            ],
        ))
        .then(edit_target(
            "player",
            ArgSpec {
                name: "user",
                kind: ArgKind::User,
            },
            [
                "permissions.edit.player.?",
                "permissions.edit.player.grant",
                "permissions.edit.player.revoke",
                "permissions.edit.player.list",
            ],
            [
                Action::GrantUser,
                Action::RevokeUser,
                Action::ListUserPermissions,
            ],
        ));

    let check = CommandNode::literal("check")
        .requires("permissions.check", 3)
        .then(
            CommandNode::literal("user")
                .arg("user", ArgKind::User)
                .arg("permission", ArgKind::Permission)
                .executes(Action::CheckUser),
        )
        .then(
            CommandNode::literal("group")
                .arg("group", ArgKind::Group)
                .arg("permission", ArgKind::Permission)
                .executes(Action::CheckGroup),
        );

    let connect = CommandNode::literal("connect")
        .requires("permissions.connect", 4)
        .arg("user", ArgKind::User)
        .executes(Action::Connect);

    let suggest = CommandNode::literal("suggest")
        .arg("prefix", ArgKind::OptionalWord)
        .executes(Action::Suggest);

    CommandTree::new()
        .command(group)
        .command(permission)
        .command(check)
        .command(connect)
        .command(suggest)
}
