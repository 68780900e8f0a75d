//! ROP request and response structures.

pub mod backoff;
pub mod buffer_too_small;
pub mod logon;
pub mod permissions;
pub mod release;

pub use backoff::{BackoffRop, RopBackoffResponse};
pub use buffer_too_small::RopBufferTooSmallResponse;
pub use logon::{
    LogonRedirect, LogonResponseBody, LogonTime, PrivateMailboxLogon, PublicFolderLogon,
    RopLogonRequest, RopLogonResponse,
};
pub use permissions::{
    PermissionData, RopGetPermissionsTableRequest, RopGetPermissionsTableResponse,
    RopModifyPermissionsRequest, RopModifyPermissionsResponse,
};
pub use release::RopReleaseRequest;
