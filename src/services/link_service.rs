//! Link creation service
//!
//! Validates a create request, resolves it against existing records and
//! inserts a new record when needed. Stateless apart from the repository
//! handle, so one instance is shared by every worker.

use std::sync::Arc;

use actix_web::http::StatusCode;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use url::Url;

use crate::config::LinksConfig;
use crate::errors::{LinkforgeError, Result};
use crate::storage::{InsertOutcome, LINK_STATUS_ACTIVE, LinkRecord, LinkRepository};
use crate::utils::validation::{
    ValidationError, is_same_domain, validate_slug, validate_url_format,
};
use crate::utils::{format_create_time, generate_random_code};

pub const SLUG_EXISTS_MESSAGE: &str = "Slug already exists.";

// ============ Request/Response DTOs ============

/// Request to create a short link
///
/// Empty strings are treated the same as missing fields.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateLinkRequest {
    pub url: Option<String>,
    pub slug: Option<String>,
}

/// Scheme and hostname the service is reached under
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceOrigin {
    scheme: String,
    hostname: String,
}

impl ServiceOrigin {
    /// Build from a request scheme and `Host` value
    ///
    /// The port is dropped and the hostname normalized by the URL parser.
    pub fn new(scheme: &str, host: &str) -> Self {
        let hostname = Url::parse(&format!("{}://{}", scheme, host))
            .ok()
            .and_then(|u| u.host_str().map(String::from))
            .unwrap_or_else(|| host.to_ascii_lowercase());

        Self {
            scheme: scheme.to_string(),
            hostname,
        }
    }

    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    /// `scheme://hostname`
    pub fn origin(&self) -> String {
        format!("{}://{}", self.scheme, self.hostname)
    }

    pub fn link_for(&self, slug: &str) -> String {
        format!("{}/{}", self.origin(), slug)
    }
}

/// Ambient metadata of the HTTP request being served
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub origin: ServiceOrigin,
    pub client_ip: Option<String>,
    pub user_agent: Option<String>,
}

/// `{slug, link}` body of a successful response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortenedLink {
    pub slug: String,
    pub link: String,
}

/// Result of a create request that passed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateOutcome {
    /// A new record was inserted
    Created(ShortenedLink),
    /// An existing record already maps this url (or this slug to this url)
    Existing(ShortenedLink),
    /// The requested slug belongs to a different url
    SlugConflict,
}

/// Tunables for slug allocation and conflict reporting
#[derive(Debug, Clone)]
pub struct LinkPolicy {
    pub random_slug_length: usize,
    pub max_insert_attempts: u32,
    pub slug_conflict_status: StatusCode,
}

impl Default for LinkPolicy {
    fn default() -> Self {
        Self::from_config(&LinksConfig::default())
    }
}

impl LinkPolicy {
    pub fn from_config(config: &LinksConfig) -> Self {
        let slug_conflict_status = match config.slug_conflict_status {
            200 => StatusCode::OK,
            409 => StatusCode::CONFLICT,
            other => {
                warn!(
                    "Unsupported links.slug_conflict_status {}, falling back to 200",
                    other
                );
                StatusCode::OK
            }
        };

        Self {
            random_slug_length: config.random_slug_length.max(1),
            max_insert_attempts: config.max_insert_attempts.max(1),
            slug_conflict_status,
        }
    }
}

// ============ Service ============

pub struct LinkService {
    repo: Arc<dyn LinkRepository>,
    policy: LinkPolicy,
}

impl LinkService {
    pub fn new(repo: Arc<dyn LinkRepository>, policy: LinkPolicy) -> Self {
        Self { repo, policy }
    }

    pub fn policy(&self) -> &LinkPolicy {
        &self.policy
    }

    /// Create (or resolve) a short link
    ///
    /// Client input problems come back as [`LinkforgeError::Validation`];
    /// datastore failures and unparsable urls as other variants.
    pub async fn create_link(
        &self,
        req: CreateLinkRequest,
        ctx: &RequestContext,
    ) -> Result<CreateOutcome> {
        let url = req
            .url
            .filter(|u| !u.is_empty())
            .ok_or(ValidationError::MissingUrl)?;
        validate_url_format(&url)?;

        let slug = req.slug.filter(|s| !s.is_empty());
        if let Some(slug) = &slug {
            validate_slug(slug)?;
        }

        // 数据库排序规则可能不区分大小写，命中后再逐字节比较一次
        match &slug {
            Some(slug) => {
                if let Some(existing) = self.repo.find_by_slug(slug).await? {
                    return Ok(resolve_taken_slug(existing, slug, &url, ctx));
                }
            }
            None => {
                let found = self.repo.find_by_url(&url).await?;
                if let Some(existing) = found.filter(|r| r.url == url) {
                    debug!("url already shortened as '{}'", existing.slug);
                    return Ok(CreateOutcome::Existing(shortened(&existing.slug, ctx)));
                }
            }
        }

        if is_same_domain(&url, ctx.origin.hostname())? {
            return Err(ValidationError::SameDomain.into());
        }

        let record = LinkRecord {
            url,
            slug: String::new(),
            ip: ctx.client_ip.clone(),
            status: LINK_STATUS_ACTIVE,
            ua: ctx.user_agent.clone(),
            create_time: format_create_time(Utc::now()),
        };

        match slug {
            Some(slug) => self.insert_custom(record, slug, ctx).await,
            None => self.insert_random(record, ctx).await,
        }
    }

    /// Insert under a caller-chosen slug; a lost race is resolved by
    /// reading back the winner
    async fn insert_custom(
        &self,
        mut record: LinkRecord,
        slug: String,
        ctx: &RequestContext,
    ) -> Result<CreateOutcome> {
        record.slug = slug;

        match self.repo.insert(&record).await? {
            InsertOutcome::Inserted => Ok(created(&record, ctx)),
            InsertOutcome::SlugTaken => {
                debug!("slug '{}' was taken concurrently, re-reading", record.slug);
                let winner = self.repo.find_by_slug(&record.slug).await?.ok_or_else(|| {
                    LinkforgeError::database_operation(format!(
                        "Slug '{}' violated the unique index but no record was found",
                        record.slug
                    ))
                })?;
                Ok(resolve_taken_slug(winner, &record.slug, &record.url, ctx))
            }
        }
    }

    /// Insert under generated slugs, drawing a fresh one on every conflict
    async fn insert_random(
        &self,
        mut record: LinkRecord,
        ctx: &RequestContext,
    ) -> Result<CreateOutcome> {
        let attempts = self.policy.max_insert_attempts;

        for attempt in 1..=attempts {
            record.slug = generate_random_code(self.policy.random_slug_length);

            match self.repo.insert(&record).await? {
                InsertOutcome::Inserted => return Ok(created(&record, ctx)),
                InsertOutcome::SlugTaken => {
                    warn!(
                        "Generated slug '{}' collided (attempt {}/{})",
                        record.slug, attempt, attempts
                    );
                }
            }
        }

        Err(LinkforgeError::slug_exhausted(format!(
            "Failed to allocate a unique slug after {} attempts.",
            attempts
        )))
    }
}

fn shortened(slug: &str, ctx: &RequestContext) -> ShortenedLink {
    ShortenedLink {
        slug: slug.to_string(),
        link: ctx.origin.link_for(slug),
    }
}

fn created(record: &LinkRecord, ctx: &RequestContext) -> CreateOutcome {
    info!("Created link '{}' -> '{}'", record.slug, record.url);
    CreateOutcome::Created(shortened(&record.slug, ctx))
}

/// 请求的 slug 已被占用时的结果
///
/// 只有 slug 和 url 都逐字节相同才算幂等重建。
fn resolve_taken_slug(
    existing: LinkRecord,
    slug: &str,
    url: &str,
    ctx: &RequestContext,
) -> CreateOutcome {
    if existing.slug == slug && existing.url == url {
        CreateOutcome::Existing(shortened(&existing.slug, ctx))
    } else {
        debug!("slug '{}' already maps to another url", existing.slug);
        CreateOutcome::SlugConflict
    }
}
