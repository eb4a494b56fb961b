//! Per-resource endpoints and request schemas

use super::kind::ResourceKind;
use crate::jsonapi::{Relationship, ResourceInput, ResourceSchema};

/// Builds the schema for one write call
///
/// Most schemas are fixed; items derive their attribute list from the input.
pub(crate) type SchemaFn = fn(&ResourceInput) -> ResourceSchema;

/// Endpoint and supported operations of one resource kind
#[derive(Debug, Clone, Copy)]
pub(crate) struct RepoSpec {
    pub path: &'static str,
    pub singleton: bool,
    pub create: Option<SchemaFn>,
    pub update: Option<SchemaFn>,
    pub destroy: bool,
}

const fn collection(path: &'static str, create: SchemaFn, update: Option<SchemaFn>) -> RepoSpec {
    RepoSpec {
        path,
        singleton: false,
        create: Some(create),
        update,
        destroy: true,
    }
}

/// Look up the endpoint table entry for `kind`
pub(crate) fn repo_spec(kind: ResourceKind) -> RepoSpec {
    match kind {
        ResourceKind::Items => collection("/items", item_create, Some(item_update)),
        ResourceKind::ItemTypes => collection("/item-types", item_type, Some(item_type)),
        ResourceKind::MenuItems => collection("/menu-items", menu_item, Some(menu_item)),
        ResourceKind::Uploads => collection("/uploads", upload_create, Some(upload_update)),
        ResourceKind::Users => collection("/users", user_create, None),
        ResourceKind::Roles => collection("/roles", role, Some(role)),
        ResourceKind::AccessTokens => {
            collection("/access-tokens", access_token, Some(access_token))
        }
        ResourceKind::Site => RepoSpec {
            path: "/site",
            singleton: true,
            create: None,
            update: Some(site_update),
            destroy: false,
        },
    }
}

/// Item attributes are whatever the caller sends, minus the reserved keys
fn open_item_schema(input: &ResourceInput) -> ResourceSchema {
    ResourceSchema::new("item")
        .attributes(input.keys().filter(|k| !matches!(*k, "item_type" | "id")))
        .relationship("item_type", Relationship::one("item_type"))
}

pub(crate) fn item_create(input: &ResourceInput) -> ResourceSchema {
    open_item_schema(input).required_relationships(["item_type"])
}

pub(crate) fn item_update(input: &ResourceInput) -> ResourceSchema {
    open_item_schema(input)
}

pub(crate) fn item_type(_: &ResourceInput) -> ResourceSchema {
    ResourceSchema::new("item_type")
        .attributes([
            "name",
            "api_key",
            "singleton",
            "sortable",
            "tree",
            "modular_block",
            "draft_mode_active",
            "all_locales_required",
            "collection_appearance",
            "ordering_direction",
            "ordering_meta",
        ])
        .relationship("ordering_field", Relationship::one("field"))
        .relationship("title_field", Relationship::one("field"))
        .required_attributes(["name", "api_key"])
}

pub(crate) fn menu_item(_: &ResourceInput) -> ResourceSchema {
    ResourceSchema::new("menu_item")
        .attributes(["label", "position", "external_url", "open_in_new_tab"])
        .relationship("item_type", Relationship::one("item_type"))
        .relationship("parent", Relationship::one("menu_item"))
        .required_attributes(["label"])
}

pub(crate) fn upload_create(_: &ResourceInput) -> ResourceSchema {
    ResourceSchema::new("upload")
        .attributes(["alt", "format", "height", "path", "size", "title", "width"])
        .required_attributes(["format", "path", "size"])
}

pub(crate) fn upload_update(_: &ResourceInput) -> ResourceSchema {
    ResourceSchema::new("upload").attributes(["alt", "title"])
}

pub(crate) fn user_create(_: &ResourceInput) -> ResourceSchema {
    ResourceSchema::new("user")
        .attributes(["email", "first_name", "last_name"])
        .relationship("role", Relationship::one("role"))
        .required_attributes(["email", "first_name", "last_name"])
        .required_relationships(["role"])
}

pub(crate) fn user_reset_password() -> ResourceSchema {
    ResourceSchema::new("user")
        .attributes(["email"])
        .required_attributes(["email"])
}

pub(crate) fn role(_: &ResourceInput) -> ResourceSchema {
    ResourceSchema::new("role")
        .attributes([
            "name",
            "can_edit_site",
            "can_edit_favicon",
            "can_edit_schema",
            "can_manage_users",
            "can_manage_access_tokens",
            "can_publish_content",
            "can_edit_others_content",
            "can_perform_site_search",
            "can_dump_data",
            "can_import_and_export",
            "positive_item_type_permissions",
            "negative_item_type_permissions",
        ])
        .required_attributes(["name"])
}

pub(crate) fn access_token(_: &ResourceInput) -> ResourceSchema {
    ResourceSchema::new("access_token")
        .attributes([
            "name",
            "can_access_content_delivery_api",
            "can_access_content_management_api",
        ])
        .relationship("role", Relationship::one("role"))
        .required_attributes(["name"])
}

pub(crate) fn site_update(_: &ResourceInput) -> ResourceSchema {
    ResourceSchema::new("site")
        .attributes([
            "name",
            "domain",
            "internal_domain",
            "locales",
            "theme",
            "timezone",
            "no_index",
            "global_seo",
            "ssg",
            "frontend_url",
        ])
        .relationship("favicon", Relationship::one("upload"))
}
