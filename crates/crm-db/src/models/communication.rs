use crate::{
    entity::entity,
    relation::{BelongsTo, HasMany, MorphTo},
    rules,
};

use super::{Group, People, User};

entity! {
    /// An email address owned by any record through `emailable_type` /
    /// `emailable_id`.
    pub struct Email / NewEmail in emails as Email {
        tenancy: [team],
        soft_deletes: no,
        mutability: Mutable,
        unique: [],
        references: [],
        morphs: [emailable_type / emailable_id],
        validate: rules::email,
    }
    {
        pub team_id: i64,
        pub emailable_type: String,
        pub emailable_id: i64,
        pub address: String,
        pub label: Option<String>,
        pub is_primary: bool,
    }
}

impl Email {
    pub const EMAILABLE: MorphTo<Email> = MorphTo::new("emailable_type", "emailable_id");
}

entity! {
    pub struct EmailProgram / NewEmailProgram in email_programs as EmailProgram {
        tenancy: [team],
        soft_deletes: yes,
        mutability: Mutable,
        unique: [],
        references: [creator_id => User],
        morphs: [],
    }
    {
        pub team_id: i64,
        pub name: String,
        pub subject: String,
        pub status: String,
        pub scheduled_at: Option<jiff_diesel::Timestamp>,
        pub sent_at: Option<jiff_diesel::Timestamp>,
        pub creator_id: Option<i64>,
    }
}

impl EmailProgram {
    pub const RECIPIENTS: HasMany<EmailProgram, EmailProgramRecipient> =
        HasMany::new("email_program_id");
    pub const BOUNCES: HasMany<EmailProgram, EmailProgramBounce> =
        HasMany::new("email_program_id");
    pub const UNSUBSCRIBES: HasMany<EmailProgram, EmailProgramUnsubscribe> =
        HasMany::new("email_program_id");
    pub const CREATOR: BelongsTo<EmailProgram, User> = BelongsTo::new("creator_id");
}

entity! {
    pub struct EmailProgramRecipient / NewEmailProgramRecipient
        in email_program_recipients as EmailProgramRecipient {
        tenancy: [team],
        soft_deletes: no,
        mutability: Mutable,
        unique: [[email_program_id, email]],
        references: [email_program_id => EmailProgram, people_id => People],
        morphs: [],
        validate: rules::recipient,
    }
    {
        pub team_id: i64,
        pub email_program_id: i64,
        pub people_id: Option<i64>,
        pub email: String,
        pub status: String,
        pub sent_at: Option<jiff_diesel::Timestamp>,
        pub opened_at: Option<jiff_diesel::Timestamp>,
    }
}

impl EmailProgramRecipient {
    pub const PROGRAM: BelongsTo<EmailProgramRecipient, EmailProgram> =
        BelongsTo::new("email_program_id");
    pub const PEOPLE: BelongsTo<EmailProgramRecipient, People> = BelongsTo::new("people_id");
}

entity! {
    pub struct EmailProgramBounce / NewEmailProgramBounce
        in email_program_bounces as EmailProgramBounce {
        tenancy: [team],
        soft_deletes: no,
        mutability: Mutable,
        unique: [],
        references: [
            email_program_id => EmailProgram,
            email_program_recipient_id => EmailProgramRecipient
        ],
        morphs: [],
    }
    {
        pub team_id: i64,
        pub email_program_id: i64,
        pub email_program_recipient_id: Option<i64>,
        pub bounce_type: String,
        pub raw_message: Option<serde_json::Value>,
        pub bounced_at: jiff_diesel::Timestamp,
    }
}

impl EmailProgramBounce {
    pub const PROGRAM: BelongsTo<EmailProgramBounce, EmailProgram> =
        BelongsTo::new("email_program_id");
    pub const RECIPIENT: BelongsTo<EmailProgramBounce, EmailProgramRecipient> =
        BelongsTo::new("email_program_recipient_id");
}

entity! {
    pub struct EmailProgramUnsubscribe / NewEmailProgramUnsubscribe
        in email_program_unsubscribes as EmailProgramUnsubscribe {
        tenancy: [team],
        soft_deletes: no,
        mutability: Mutable,
        unique: [[team_id, email_program_id, email]],
        references: [email_program_id => EmailProgram],
        morphs: [],
    }
    {
        pub team_id: i64,
        pub email_program_id: i64,
        pub email: String,
        pub reason: Option<String>,
        pub unsubscribed_at: jiff_diesel::Timestamp,
    }
}

impl EmailProgramUnsubscribe {
    pub const PROGRAM: BelongsTo<EmailProgramUnsubscribe, EmailProgram> =
        BelongsTo::new("email_program_id");
}

entity! {
    pub struct SecurityGroupBroadcastMessage / NewSecurityGroupBroadcastMessage
        in security_group_broadcast_messages as SecurityGroupBroadcastMessage {
        tenancy: [team],
        soft_deletes: no,
        mutability: Mutable,
        unique: [],
        references: [group_id => Group, sender_id => User],
        morphs: [],
    }
    {
        pub team_id: i64,
        pub group_id: i64,
        pub sender_id: Option<i64>,
        pub subject: String,
        pub body: String,
        pub requires_acknowledgment: bool,
    }
}

impl SecurityGroupBroadcastMessage {
    pub const GROUP: BelongsTo<SecurityGroupBroadcastMessage, Group> = BelongsTo::new("group_id");
    pub const ACKNOWLEDGMENTS: HasMany<
        SecurityGroupBroadcastMessage,
        SecurityGroupMessageAcknowledgment,
    > = HasMany::new("message_id");
}

entity! {
    pub struct SecurityGroupMessageAcknowledgment / NewSecurityGroupMessageAcknowledgment
        in security_group_message_acknowledgments as SecurityGroupMessageAcknowledgment {
        tenancy: [team],
        soft_deletes: no,
        mutability: Mutable,
        unique: [[message_id, user_id]],
        references: [message_id => SecurityGroupBroadcastMessage, user_id => User],
        morphs: [],
    }
    {
        pub team_id: i64,
        pub message_id: i64,
        pub user_id: i64,
        pub acknowledged_at: jiff_diesel::Timestamp,
    }
}

impl SecurityGroupMessageAcknowledgment {
    pub const MESSAGE: BelongsTo<
        SecurityGroupMessageAcknowledgment,
        SecurityGroupBroadcastMessage,
    > =
        BelongsTo::new("message_id");
}
