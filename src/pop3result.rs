/// Reply to STAT: message count and total size in octets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct POP3Stat {
    pub num_mails: u32,
    pub mbox_size: u64,
}

/// One LIST entry. Message numbers are only valid for the current session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmailMetadata {
    pub msg_num: u32,
    pub msg_size: u64,
}

/// One UIDL entry. The unique id is opaque and kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailUid {
    pub msg_num: u32,
    pub uid: String,
}
