use crate::{
    entity::entity,
    relation::{BelongsTo, BelongsToMany, HasMany, HasOne, MorphTo},
    rules, tasks,
};

use super::User;

entity! {
    pub struct Task / NewTask in tasks as Task {
        tenancy: [team],
        soft_deletes: yes,
        mutability: Mutable,
        unique: [],
        references: [assignee_id => User, creator_id => User],
        morphs: [],
    }
    {
        pub team_id: i64,
        pub title: String,
        pub description: Option<String>,
        pub status: String,
        pub priority: Option<String>,
        pub due_at: Option<jiff_diesel::Timestamp>,
        pub completed_at: Option<jiff_diesel::Timestamp>,
        pub assignee_id: Option<i64>,
        pub creator_id: Option<i64>,
    }
}

impl Task {
    pub const CHECKLIST: HasMany<Task, TaskChecklistItem> = HasMany::new("task_id");
    pub const REMINDERS: HasMany<Task, TaskReminder> = HasMany::new("task_id");
    pub const RECURRENCE: HasOne<Task, TaskRecurrence> = HasOne::new("task_id");
    pub const ASSIGNEE: BelongsTo<Task, User> = BelongsTo::new("assignee_id");
}

entity! {
    pub struct TaskChecklistItem / NewTaskChecklistItem
        in task_checklist_items as TaskChecklistItem {
        tenancy: [team],
        soft_deletes: no,
        mutability: Mutable,
        unique: [],
        references: [task_id => Task],
        morphs: [],
    }
    {
        pub team_id: i64,
        pub task_id: i64,
        pub title: String,
        pub is_completed: bool,
        pub position: i32,
    }
}

impl TaskChecklistItem {
    pub const TASK: BelongsTo<TaskChecklistItem, Task> = BelongsTo::new("task_id");
}

entity! {
    /// A declarative repeat rule. Occurrences are materialised elsewhere, see
    /// [`crate::schedule::materialize`].
    pub struct TaskRecurrence / NewTaskRecurrence in task_recurrences as TaskRecurrence {
        tenancy: [team],
        soft_deletes: no,
        mutability: Mutable,
        unique: [[task_id]],
        references: [task_id => Task],
        morphs: [],
        validate: tasks::validate_recurrence,
    }
    {
        pub team_id: i64,
        pub task_id: i64,
        pub frequency: String,
        pub interval: i32,
        /// ISO weekday numbers, Monday is 1.
        pub days_of_week: Option<serde_json::Value>,
        pub starts_on: jiff_diesel::Date,
        pub ends_on: Option<jiff_diesel::Date>,
        pub max_occurrences: Option<i32>,
        pub timezone: String,
    }
}

impl TaskRecurrence {
    pub const TASK: BelongsTo<TaskRecurrence, Task> = BelongsTo::new("task_id");
}

entity! {
    pub struct TaskReminder / NewTaskReminder in task_reminders as TaskReminder {
        tenancy: [team],
        soft_deletes: no,
        mutability: Mutable,
        unique: [],
        references: [task_id => Task, user_id => User],
        morphs: [],
        validate: tasks::validate_reminder,
    }
    {
        pub team_id: i64,
        pub task_id: i64,
        pub user_id: Option<i64>,
        pub remind_at: jiff_diesel::Timestamp,
        pub channel: String,
        pub sent_at: Option<jiff_diesel::Timestamp>,
        pub canceled_at: Option<jiff_diesel::Timestamp>,
    }
}

impl TaskReminder {
    pub const TASK: BelongsTo<TaskReminder, Task> = BelongsTo::new("task_id");
}

entity! {
    pub struct SavedSearch / NewSavedSearch in saved_searches as SavedSearch {
        tenancy: [team],
        soft_deletes: no,
        mutability: Mutable,
        unique: [],
        references: [user_id => User],
        morphs: [],
        validate: rules::saved_search,
    }
    {
        pub team_id: i64,
        pub user_id: i64,
        pub name: String,
        pub resource: String,
        pub filters: serde_json::Value,
    }
}

entity! {
    /// A note attached to any record through `notable_type` / `notable_id`.
    pub struct NotableEntry / NewNotableEntry in notes as NotableEntry {
        tenancy: [team],
        soft_deletes: yes,
        mutability: Mutable,
        unique: [],
        references: [creator_id => User],
        morphs: [notable_type / notable_id],
    }
    {
        pub team_id: i64,
        pub notable_type: String,
        pub notable_id: i64,
        pub title: Option<String>,
        pub body: String,
        pub creator_id: Option<i64>,
    }
}

impl NotableEntry {
    pub const NOTABLE: MorphTo<NotableEntry> = MorphTo::new("notable_type", "notable_id");
}

entity! {
    pub struct KnowledgeArticle / NewKnowledgeArticle in knowledge_articles as KnowledgeArticle {
        tenancy: [team],
        soft_deletes: yes,
        mutability: Mutable,
        unique: [[team_id, slug]],
        references: [author_id => User],
        morphs: [],
    }
    {
        pub team_id: i64,
        pub title: String,
        pub slug: String,
        pub body: String,
        pub status: String,
        pub author_id: Option<i64>,
        pub published_at: Option<jiff_diesel::Timestamp>,
    }
}

impl KnowledgeArticle {
    pub const TAGS: BelongsToMany<KnowledgeArticle, KnowledgeTag, KnowledgeArticleTag> =
        BelongsToMany::new("knowledge_article_id", "knowledge_tag_id");
    pub const RELATED: BelongsToMany<KnowledgeArticle, KnowledgeArticle, KnowledgeArticleRelation> =
        BelongsToMany::new("article_id", "related_article_id");
    pub const RELATED_FROM: BelongsToMany<
        KnowledgeArticle,
        KnowledgeArticle,
        KnowledgeArticleRelation,
    > = BelongsToMany::new("related_article_id", "article_id");
}

entity! {
    /// A typed link between two articles of the same tenant.
    pub struct KnowledgeArticleRelation / NewKnowledgeArticleRelation
        in knowledge_article_relations as KnowledgeArticleRelation {
        tenancy: [team],
        soft_deletes: no,
        mutability: Mutable,
        unique: [[article_id, related_article_id, relation_type]],
        references: [article_id => KnowledgeArticle, related_article_id => KnowledgeArticle],
        morphs: [],
        validate: rules::knowledge_article_relation,
    }
    {
        pub team_id: i64,
        pub article_id: i64,
        pub related_article_id: i64,
        pub relation_type: String,
    }
}

impl NewKnowledgeArticleRelation {
    pub fn typed(relation_type: impl Into<String>) -> Self {
        Self {
            team_id: 0,
            article_id: 0,
            related_article_id: 0,
            relation_type: relation_type.into(),
        }
    }
}

entity! {
    pub struct KnowledgeTag / NewKnowledgeTag in knowledge_tags as KnowledgeTag {
        tenancy: [team],
        soft_deletes: no,
        mutability: Mutable,
        unique: [[team_id, slug]],
        references: [],
        morphs: [],
    }
    {
        pub team_id: i64,
        pub name: String,
        pub slug: String,
    }
}

impl KnowledgeTag {
    pub const ARTICLES: BelongsToMany<KnowledgeTag, KnowledgeArticle, KnowledgeArticleTag> =
        BelongsToMany::new("knowledge_tag_id", "knowledge_article_id");
}

entity! {
    pub struct KnowledgeArticleTag / NewKnowledgeArticleTag
        in knowledge_article_tag as KnowledgeArticleTag {
        tenancy: [team],
        soft_deletes: no,
        mutability: Mutable,
        unique: [[knowledge_article_id, knowledge_tag_id]],
        references: [knowledge_article_id => KnowledgeArticle, knowledge_tag_id => KnowledgeTag],
        morphs: [],
    }
    {
        pub team_id: i64,
        pub knowledge_article_id: i64,
        pub knowledge_tag_id: i64,
    }
}

impl Default for NewKnowledgeArticleTag {
    fn default() -> Self {
        Self {
            team_id: 0,
            knowledge_article_id: 0,
            knowledge_tag_id: 0,
        }
    }
}
