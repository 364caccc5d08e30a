pub mod connection;
pub mod contact;
pub mod identifier;
pub mod note;
pub mod oob;

pub use connection::{
    ConnectionDetails, ConnectionRecord, ConnectionRole, ConnectionShortDetails, ConnectionState,
    ConnectionStatus,
};
pub use contact::RemoteContact;
pub use identifier::{GroupMetadata, IdentifierRecord};
pub use note::{ConnectionNote, NoteContent};
pub use oob::{OobRole, OobState, OutOfBandInvitation, OutOfBandRecord};
