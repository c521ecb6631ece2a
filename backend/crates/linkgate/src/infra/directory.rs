//! Account File Directory
//!
//! Reads `passwd(5)` and `group(5)` formatted files. Only local accounts are
//! visible; NSS sources such as LDAP are not consulted.

use std::path::{Path, PathBuf};

use crate::domain::ports::IdentityDirectory;
use crate::domain::value_objects::{GroupEntry, UserEntry, Username};
use crate::error::{GateError, GateResult};

/// Directory backed by `/etc/passwd` and `/etc/group` style files
#[derive(Debug, Clone)]
pub struct AccountFileDirectory {
    passwd_file: PathBuf,
    group_file: PathBuf,
}

impl AccountFileDirectory {
    pub fn new(passwd_file: impl Into<PathBuf>, group_file: impl Into<PathBuf>) -> Self {
        Self {
            passwd_file: passwd_file.into(),
            group_file: group_file.into(),
        }
    }

    async fn read(path: &Path) -> GateResult<String> {
        tokio::fs::read_to_string(path).await.map_err(|e| {
            GateError::IdentityLookup(format!("cannot read {}: {e}", path.display()))
        })
    }
}

impl Default for AccountFileDirectory {
    fn default() -> Self {
        Self::new("/etc/passwd", "/etc/group")
    }
}

/// `name:password:gid:member,member`
pub fn parse_group_line(line: &str) -> Option<GroupEntry> {
    let mut fields = line.split(':');
    let name = fields.next()?;
    let _password = fields.next()?;
    let gid = fields.next()?.trim().parse().ok()?;
    let members = fields
        .next()
        .unwrap_or("")
        .split(',')
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
        .collect();
    Some(GroupEntry {
        name: name.to_string(),
        gid,
        members,
    })
}

/// `name:password:uid:gid:gecos:home:shell`
pub fn parse_passwd_line(line: &str) -> Option<UserEntry> {
    let mut fields = line.split(':');
    let name = fields.next()?;
    let _password = fields.next()?;
    let _uid = fields.next()?;
    let primary_gid = fields.next()?.trim().parse().ok()?;
    Some(UserEntry {
        name: name.to_string(),
        primary_gid,
    })
}

fn records(text: &str) -> impl Iterator<Item = &str> {
    text.lines()
        .map(str::trim_end)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
}

impl IdentityDirectory for AccountFileDirectory {
    async fn find_group(&self, name: &str) -> GateResult<Option<GroupEntry>> {
        let text = Self::read(&self.group_file).await?;
        Ok(records(&text)
            .filter_map(parse_group_line)
            .find(|g| g.name == name))
    }

    async fn find_user(&self, username: &Username) -> GateResult<Option<UserEntry>> {
        let text = Self::read(&self.passwd_file).await?;
        Ok(records(&text)
            .filter_map(parse_passwd_line)
            .find(|u| u.name == username.as_str()))
    }
}
