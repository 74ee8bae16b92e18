//! Role-based access control for content operations.
//!
//! Every content operation asks [`authorize`] before touching the store. The
//! decision depends only on the caller's role claim and, for single-item
//! actions, the stored owner of the item.

use super::{Error, Principal, Role, RoleClaim, UserId, Visibility};

/// Operation a caller wants to perform on content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentAction<'a> {
    List,
    Search,
    AdminList,
    Create,
    Read { owner: &'a UserId },
    Update { owner: &'a UserId },
    Delete { owner: &'a UserId },
}

impl ContentAction<'_> {
    fn denial_for_unrecognized(self) -> &'static str {
        match self {
            Self::List | Self::Read { .. } => "You don't have permission to view content.",
            Self::Search => "You don't have permission to search content.",
            Self::AdminList => FORBIDDEN_DEFAULT,
            Self::Create => "You don't have permission to create content.",
            Self::Update { .. } => "You don't have permission to update content.",
            Self::Delete { .. } => "You don't have permission to delete content.",
        }
    }

    fn denial_for_non_owner(self) -> &'static str {
        match self {
            Self::Read { .. } => "You can only view your own content.",
            Self::Update { .. } => "You can only update your own content.",
            Self::Delete { .. } => "You can only delete your own content.",
            _ => FORBIDDEN_DEFAULT,
        }
    }
}

const FORBIDDEN_DEFAULT: &str = "You do not have permission to perform this action.";

/// Breadth of a granted operation.
///
/// `All` lets the caller act across every owner. `Own` restricts the caller
/// to items they author; for create it also fixes the author to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    All,
    Own(UserId),
}

impl From<Scope> for Visibility {
    fn from(value: Scope) -> Self {
        match value {
            Scope::All => Visibility::All,
            Scope::Own(owner) => Visibility::OwnedBy(owner),
        }
    }
}

/// Decide whether `principal` may perform `action`.
///
/// | action              | admin | author                 | unrecognised |
/// |---------------------|-------|------------------------|--------------|
/// | list, search        | all   | own items only         | forbidden    |
/// | create              | all   | author forced to self  | forbidden    |
/// | read/update/delete  | all   | owner only             | forbidden    |
/// | admin list          | all   | forbidden              | forbidden    |
///
/// # Examples
/// ```
/// use cms_backend::domain::{authorize, ContentAction, Principal, Role, Scope, UserId};
///
/// let author = Principal::new(UserId::random(), Role::Author);
/// let scope = authorize(&author, ContentAction::List).expect("authors may list");
/// assert_eq!(scope, Scope::Own(author.user_id));
/// assert!(authorize(&author, ContentAction::AdminList).is_err());
/// ```
pub fn authorize(principal: &Principal, action: ContentAction<'_>) -> Result<Scope, Error> {
    let caller = principal.user_id;
    match &principal.role {
        RoleClaim::Known(Role::Admin) => Ok(Scope::All),
        RoleClaim::Known(Role::Author) => match action {
            ContentAction::List | ContentAction::Search | ContentAction::Create => {
                Ok(Scope::Own(caller))
            }
            ContentAction::AdminList => Err(Error::forbidden(FORBIDDEN_DEFAULT)),
            ContentAction::Read { owner }
            | ContentAction::Update { owner }
            | ContentAction::Delete { owner } => {
                if *owner == caller {
                    Ok(Scope::Own(caller))
                } else {
                    Err(Error::forbidden(action.denial_for_non_owner()))
                }
            }
        },
        RoleClaim::Unrecognized(_) => Err(Error::forbidden(action.denial_for_unrecognized())),
    }
}

#[cfg(test)]
mod tests {
    //! Decision table coverage.
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[derive(Debug, Clone, Copy)]
    enum Who {
        Admin,
        Owner,
        NonOwner,
        Unknown,
    }

    #[derive(Debug, Clone, Copy)]
    enum Op {
        List,
        Search,
        AdminList,
        Create,
        Read,
        Update,
        Delete,
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Expect {
        All,
        Own,
        Forbidden,
    }

    fn decide(who: Who, op: Op) -> (Principal, Result<Scope, Error>) {
        let owner = UserId::random();
        let principal = match who {
            Who::Admin => Principal::new(UserId::random(), Role::Admin),
            Who::Owner => Principal::new(owner, Role::Author),
            Who::NonOwner => Principal::new(UserId::random(), Role::Author),
            Who::Unknown => Principal::new(owner, RoleClaim::Unrecognized("editor".into())),
        };
        let action = match op {
            Op::List => ContentAction::List,
            Op::Search => ContentAction::Search,
            Op::AdminList => ContentAction::AdminList,
            Op::Create => ContentAction::Create,
            Op::Read => ContentAction::Read { owner: &owner },
            Op::Update => ContentAction::Update { owner: &owner },
            Op::Delete => ContentAction::Delete { owner: &owner },
        };
        let decision = authorize(&principal, action);
        (principal, decision)
    }

    #[rstest]
    #[case(Who::Admin, Op::List, Expect::All)]
    #[case(Who::Admin, Op::Search, Expect::All)]
    #[case(Who::Admin, Op::AdminList, Expect::All)]
    #[case(Who::Admin, Op::Create, Expect::All)]
    #[case(Who::Admin, Op::Read, Expect::All)]
    #[case(Who::Admin, Op::Update, Expect::All)]
    #[case(Who::Admin, Op::Delete, Expect::All)]
    #[case(Who::Owner, Op::List, Expect::Own)]
    #[case(Who::Owner, Op::Search, Expect::Own)]
    #[case(Who::Owner, Op::AdminList, Expect::Forbidden)]
    #[case(Who::Owner, Op::Create, Expect::Own)]
    #[case(Who::Owner, Op::Read, Expect::Own)]
    #[case(Who::Owner, Op::Update, Expect::Own)]
    #[case(Who::Owner, Op::Delete, Expect::Own)]
    #[case(Who::NonOwner, Op::AdminList, Expect::Forbidden)]
    #[case(Who::NonOwner, Op::Read, Expect::Forbidden)]
    #[case(Who::NonOwner, Op::Update, Expect::Forbidden)]
    #[case(Who::NonOwner, Op::Delete, Expect::Forbidden)]
    #[case(Who::Unknown, Op::List, Expect::Forbidden)]
    #[case(Who::Unknown, Op::Search, Expect::Forbidden)]
    #[case(Who::Unknown, Op::AdminList, Expect::Forbidden)]
    #[case(Who::Unknown, Op::Create, Expect::Forbidden)]
    #[case(Who::Unknown, Op::Read, Expect::Forbidden)]
    #[case(Who::Unknown, Op::Update, Expect::Forbidden)]
    #[case(Who::Unknown, Op::Delete, Expect::Forbidden)]
    fn decision_table(#[case] who: Who, #[case] op: Op, #[case] expected: Expect) {
        let (principal, decision) = decide(who, op);
        match expected {
            Expect::All => assert_eq!(decision.expect("allowed"), Scope::All),
            Expect::Own => assert_eq!(decision.expect("allowed"), Scope::Own(principal.user_id)),
            Expect::Forbidden => {
                let err = decision.expect_err("denied");
                assert_eq!(err.code(), ErrorCode::Forbidden);
            }
        }
    }

    #[rstest]
    #[case(Op::Read, "You can only view your own content.")]
    #[case(Op::Update, "You can only update your own content.")]
    #[case(Op::Delete, "You can only delete your own content.")]
    fn ownership_denials_name_the_action(#[case] op: Op, #[case] message: &str) {
        let (_, decision) = decide(Who::NonOwner, op);
        assert_eq!(decision.expect_err("denied").message(), message);
    }

    #[rstest]
    fn scope_maps_to_visibility() {
        let id = UserId::random();
        assert_eq!(Visibility::from(Scope::All), Visibility::All);
        assert_eq!(Visibility::from(Scope::Own(id)), Visibility::OwnedBy(id));
    }
}
