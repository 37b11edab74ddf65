use super::{ColumnDef, ColumnType::*, IndexDef, TableDef};

const NOW: &str = "NOW()";
const RANDOM_UUID: &str = "gen_random_uuid()";

/// Profile rows extend the identity provider's users; `id` is the provider's subject id.
pub const PROFILES: TableDef = TableDef {
    name: "profiles",
    columns: &[
        ColumnDef::new("id", Uuid).primary_key(),
        ColumnDef::new("username", Varchar(50)).unique(),
        ColumnDef::new("display_name", Varchar(100)),
        ColumnDef::new("avatar_url", Text),
        ColumnDef::new("bio", Text),
        ColumnDef::new("role", Varchar(20)).not_null().default_sql("'user'"),
        ColumnDef::new("created_at", Timestamptz).not_null().default_sql(NOW),
        ColumnDef::new("updated_at", Timestamptz).not_null().default_sql(NOW),
    ],
    indexes: &[],
};

pub const POSTS: TableDef = TableDef {
    name: "posts",
    columns: &[
        ColumnDef::new("id", Uuid).primary_key().default_sql(RANDOM_UUID),
        ColumnDef::new("title", Varchar(200)).not_null(),
        ColumnDef::new("slug", Varchar(200)).not_null().unique(),
        ColumnDef::new("content", Text),
        ColumnDef::new("excerpt", Text),
        ColumnDef::new("cover_image", Text),
        // draft, published, scheduled
        ColumnDef::new("status", Varchar(20)).not_null().default_sql("'draft'"),
        ColumnDef::new("published_at", Timestamptz),
        ColumnDef::new("author_id", Uuid).references("profiles", "id"),
        ColumnDef::new("meta_title", Varchar(200)),
        ColumnDef::new("meta_description", Text),
        ColumnDef::new("meta_keywords", Text),
        ColumnDef::new("view_count", Integer).not_null().default_sql("0"),
        ColumnDef::new("created_at", Timestamptz).not_null().default_sql(NOW),
        ColumnDef::new("updated_at", Timestamptz).not_null().default_sql(NOW),
    ],
    indexes: &[
        IndexDef { name: "posts_created_at_idx", columns: &["created_at"] },
        IndexDef { name: "posts_status_idx", columns: &["status"] },
    ],
};

pub const CATEGORIES: TableDef = TableDef {
    name: "categories",
    columns: &[
        ColumnDef::new("id", Uuid).primary_key().default_sql(RANDOM_UUID),
        ColumnDef::new("name", Varchar(50)).not_null(),
        ColumnDef::new("slug", Varchar(50)).not_null().unique(),
        ColumnDef::new("description", Text),
        // Self reference, not enforced.
        ColumnDef::new("parent_id", Uuid),
        ColumnDef::new("sort_order", Integer).not_null().default_sql("0"),
        ColumnDef::new("created_at", Timestamptz).not_null().default_sql(NOW),
    ],
    indexes: &[],
};

pub const TAGS: TableDef = TableDef {
    name: "tags",
    columns: &[
        ColumnDef::new("id", Uuid).primary_key().default_sql(RANDOM_UUID),
        ColumnDef::new("name", Varchar(50)).not_null(),
        ColumnDef::new("slug", Varchar(50)).not_null().unique(),
        ColumnDef::new("created_at", Timestamptz).not_null().default_sql(NOW),
    ],
    indexes: &[],
};

pub const MESSAGES: TableDef = TableDef {
    name: "messages",
    columns: &[
        ColumnDef::new("id", Uuid).primary_key().default_sql(RANDOM_UUID),
        ColumnDef::new("name", Varchar(100)).not_null(),
        ColumnDef::new("email", Varchar(255)).not_null(),
        ColumnDef::new("subject", Varchar(200)),
        ColumnDef::new("content", Text).not_null(),
        ColumnDef::new("is_read", Boolean).not_null().default_sql("FALSE"),
        ColumnDef::new("ip_address", Varchar(45)),
        ColumnDef::new("user_agent", Text),
        ColumnDef::new("locale", Varchar(10)),
        ColumnDef::new("created_at", Timestamptz).not_null().default_sql(NOW),
        ColumnDef::new("read_at", Timestamptz),
    ],
    indexes: &[
        IndexDef { name: "messages_created_at_idx", columns: &["created_at"] },
        IndexDef { name: "messages_is_read_idx", columns: &["is_read"] },
    ],
};

pub const MEDIA: TableDef = TableDef {
    name: "media",
    columns: &[
        ColumnDef::new("id", Uuid).primary_key().default_sql(RANDOM_UUID),
        ColumnDef::new("filename", Varchar(255)).not_null(),
        ColumnDef::new("original_name", Varchar(255)),
        // relative to the storage root
        ColumnDef::new("path", Text).not_null(),
        ColumnDef::new("mime_type", Varchar(100)),
        ColumnDef::new("size", Integer),
        ColumnDef::new("width", Integer),
        ColumnDef::new("height", Integer),
        ColumnDef::new("alt_text", Varchar(255)),
        ColumnDef::new("uploaded_by", Uuid).references("profiles", "id"),
        ColumnDef::new("created_at", Timestamptz).not_null().default_sql(NOW),
    ],
    indexes: &[IndexDef { name: "media_created_at_idx", columns: &["created_at"] }],
};

pub const SETTINGS: TableDef = TableDef {
    name: "settings",
    columns: &[
        ColumnDef::new("key", Varchar(100)).primary_key(),
        ColumnDef::new("value", Jsonb),
        ColumnDef::new("updated_at", Timestamptz).not_null().default_sql(NOW),
    ],
    indexes: &[],
};

/// All tables in creation order (referenced tables first).
pub const ALL_TABLES: &[&TableDef] = &[&PROFILES, &POSTS, &CATEGORIES, &TAGS, &MESSAGES, &MEDIA, &SETTINGS];
