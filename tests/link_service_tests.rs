//! LinkService 单元级集成测试
//!
//! 使用内存 mock 仓库注入数据库错误与 slug 唯一约束竞争。

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use actix_web::http::StatusCode;
use async_trait::async_trait;
use tokio::sync::Mutex;

use linkforge::errors::{LinkforgeError, Result};
use linkforge::services::{
    CreateLinkRequest, CreateOutcome, LinkPolicy, LinkService, RequestContext, ServiceOrigin,
    ShortenedLink,
};
use linkforge::storage::{InsertOutcome, LinkRecord, LinkRepository};

// =============================================================================
// Mock 仓库
// =============================================================================

#[derive(Default)]
struct MockRepository {
    records: Mutex<Vec<LinkRecord>>,
    /// 接下来多少次插入直接报告 slug 冲突
    forced_conflicts: AtomicU32,
    /// 第一次强制冲突时写入的"并发赢家"
    race_winner: Mutex<Option<LinkRecord>>,
    failure: Option<String>,
    insert_calls: AtomicU32,
    /// 模拟 `*_ci` 排序规则：查询时忽略大小写
    case_insensitive: bool,
}

impl MockRepository {
    fn new() -> Self {
        Self::default()
    }

    fn failing(message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
            ..Self::default()
        }
    }

    fn with_conflicts(count: u32) -> Self {
        let repo = Self::default();
        repo.forced_conflicts.store(count, Ordering::SeqCst);
        repo
    }

    fn case_insensitive() -> Self {
        Self {
            case_insensitive: true,
            ..Self::default()
        }
    }

    fn matches(&self, stored: &str, wanted: &str) -> bool {
        if self.case_insensitive {
            stored.eq_ignore_ascii_case(wanted)
        } else {
            stored == wanted
        }
    }

    async fn seed(&self, slug: &str, url: &str) {
        self.records.lock().await.push(record(slug, url));
    }

    fn check(&self) -> Result<()> {
        match &self.failure {
            Some(msg) => Err(LinkforgeError::database_operation(msg.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl LinkRepository for MockRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<LinkRecord>> {
        self.check()?;
        Ok(self
            .records
            .lock()
            .await
            .iter()
            .find(|r| self.matches(&r.slug, slug))
            .cloned())
    }

    async fn find_by_url(&self, url: &str) -> Result<Option<LinkRecord>> {
        self.check()?;
        Ok(self
            .records
            .lock()
            .await
            .iter()
            .find(|r| self.matches(&r.url, url))
            .cloned())
    }

    async fn insert(&self, link: &LinkRecord) -> Result<InsertOutcome> {
        self.check()?;
        self.insert_calls.fetch_add(1, Ordering::SeqCst);

        let mut records = self.records.lock().await;
        if self.forced_conflicts.load(Ordering::SeqCst) > 0 {
            self.forced_conflicts.fetch_sub(1, Ordering::SeqCst);
            if let Some(winner) = self.race_winner.lock().await.take() {
                records.push(winner);
            }
            return Ok(InsertOutcome::SlugTaken);
        }
        if records.iter().any(|r| r.slug == link.slug) {
            return Ok(InsertOutcome::SlugTaken);
        }
        records.push(link.clone());
        Ok(InsertOutcome::Inserted)
    }
}

// =============================================================================
// 辅助函数
// =============================================================================

fn record(slug: &str, url: &str) -> LinkRecord {
    LinkRecord {
        url: url.to_string(),
        slug: slug.to_string(),
        ip: None,
        status: 1,
        ua: None,
        create_time: "2024年5月3日 08:05:09".to_string(),
    }
}

fn context() -> RequestContext {
    RequestContext {
        origin: ServiceOrigin::new("https", "short.example"),
        client_ip: Some("203.0.113.9".to_string()),
        user_agent: Some("test-agent".to_string()),
    }
}

fn request(url: &str, slug: Option<&str>) -> CreateLinkRequest {
    CreateLinkRequest {
        url: Some(url.to_string()),
        slug: slug.map(String::from),
    }
}

fn service(repo: Arc<MockRepository>) -> LinkService {
    LinkService::new(repo, LinkPolicy::default())
}

// =============================================================================
// 校验
// =============================================================================

#[tokio::test]
async fn test_missing_url_is_validation_error() {
    let svc = service(Arc::new(MockRepository::new()));

    let err = svc
        .create_link(CreateLinkRequest::default(), &context())
        .await
        .unwrap_err();
    assert!(matches!(err, LinkforgeError::Validation(_)));
    assert_eq!(err.message(), "Missing required parameter: url.");
    assert_eq!(err.http_status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_validation_runs_before_datastore() {
    let repo = Arc::new(MockRepository::failing("should not be reached"));
    let svc = service(repo);

    let err = svc
        .create_link(request("https://example.com", Some("x")), &context())
        .await
        .unwrap_err();
    assert!(matches!(err, LinkforgeError::Validation(_)));
}

// =============================================================================
// 解析算法
// =============================================================================

#[tokio::test]
async fn test_generated_slug_shape_and_record_fields() {
    let repo = Arc::new(MockRepository::new());
    let svc = service(repo.clone());

    let outcome = svc
        .create_link(request("https://example.com", None), &context())
        .await
        .unwrap();

    let link = match outcome {
        CreateOutcome::Created(link) => link,
        other => panic!("expected Created, got {:?}", other),
    };
    assert_eq!(link.slug.len(), 6);
    assert!(link.slug.chars().all(|c| c.is_ascii_alphanumeric()));
    assert_eq!(link.link, format!("https://short.example/{}", link.slug));

    let records = repo.records.lock().await;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].status, 1);
    assert_eq!(records[0].ip.as_deref(), Some("203.0.113.9"));
    assert_eq!(records[0].ua.as_deref(), Some("test-agent"));
}

#[tokio::test]
async fn test_existing_url_reused_without_insert() {
    let repo = Arc::new(MockRepository::new());
    repo.seed("old123", "https://example.com").await;
    let svc = service(repo.clone());

    let outcome = svc
        .create_link(request("https://example.com", None), &context())
        .await
        .unwrap();

    assert_eq!(
        outcome,
        CreateOutcome::Existing(ShortenedLink {
            slug: "old123".to_string(),
            link: "https://short.example/old123".to_string(),
        })
    );
    assert_eq!(repo.insert_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_custom_slug_ignores_url_dedup() {
    let repo = Arc::new(MockRepository::new());
    repo.seed("old123", "https://example.com").await;
    let svc = service(repo.clone());

    let outcome = svc
        .create_link(request("https://example.com", Some("fresh")), &context())
        .await
        .unwrap();

    assert!(matches!(outcome, CreateOutcome::Created(ref l) if l.slug == "fresh"));
    assert_eq!(repo.records.lock().await.len(), 2);
}

#[tokio::test]
async fn test_dedup_precedes_same_domain_check() {
    let repo = Arc::new(MockRepository::new());
    repo.seed("self01", "https://short.example/page").await;
    let svc = service(repo);

    let outcome = svc
        .create_link(request("https://short.example/page", None), &context())
        .await
        .unwrap();
    assert!(matches!(outcome, CreateOutcome::Existing(_)));
}

#[tokio::test]
async fn test_same_domain_rejected_before_insert() {
    let repo = Arc::new(MockRepository::new());
    let svc = service(repo.clone());

    let err = svc
        .create_link(request("https://short.example/page", None), &context())
        .await
        .unwrap_err();
    assert_eq!(err.message(), "You cannot shorten a link to the same domain.");
    assert_eq!(repo.insert_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_slug_conflict_and_idempotency() {
    let repo = Arc::new(MockRepository::new());
    repo.seed("abc123", "https://example.com").await;
    let svc = service(repo.clone());

    let same = svc
        .create_link(request("https://example.com", Some("abc123")), &context())
        .await
        .unwrap();
    assert!(matches!(same, CreateOutcome::Existing(ref l) if l.slug == "abc123"));

    let other = svc
        .create_link(request("https://other.example", Some("abc123")), &context())
        .await
        .unwrap();
    assert_eq!(other, CreateOutcome::SlugConflict);
    assert_eq!(repo.insert_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_url_dedup_is_exact_under_case_insensitive_lookup() {
    let repo = Arc::new(MockRepository::case_insensitive());
    repo.seed("lower1", "https://x.com/page").await;
    let svc = service(repo.clone());

    let outcome = svc
        .create_link(request("https://x.com/Page", None), &context())
        .await
        .unwrap();

    match outcome {
        CreateOutcome::Created(link) => assert_ne!(link.slug, "lower1"),
        other => panic!("expected Created, got {:?}", other),
    }
    assert_eq!(repo.insert_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_slug_case_variant_is_not_idempotent() {
    let repo = Arc::new(MockRepository::case_insensitive());
    repo.seed("abc123", "https://example.com").await;
    let svc = service(repo.clone());

    let outcome = svc
        .create_link(request("https://example.com", Some("ABC123")), &context())
        .await
        .unwrap();

    assert_eq!(outcome, CreateOutcome::SlugConflict);
    assert_eq!(repo.insert_calls.load(Ordering::SeqCst), 0);
}

// =============================================================================
// 唯一约束竞争
// =============================================================================

#[tokio::test]
async fn test_generated_slug_retried_on_conflict() {
    let repo = Arc::new(MockRepository::with_conflicts(2));
    let svc = service(repo.clone());

    let outcome = svc
        .create_link(request("https://example.com", None), &context())
        .await
        .unwrap();

    assert!(matches!(outcome, CreateOutcome::Created(_)));
    assert_eq!(repo.insert_calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_generated_slug_exhaustion() {
    let repo = Arc::new(MockRepository::with_conflicts(u32::MAX));
    let policy = LinkPolicy {
        max_insert_attempts: 3,
        ..LinkPolicy::default()
    };
    let svc = LinkService::new(repo.clone(), policy);

    let err = svc
        .create_link(request("https://example.com", None), &context())
        .await
        .unwrap_err();

    assert!(matches!(err, LinkforgeError::SlugExhausted(_)));
    assert_eq!(
        err.message(),
        "Failed to allocate a unique slug after 3 attempts."
    );
    assert_eq!(err.http_status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(repo.insert_calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_custom_slug_race_with_same_url_is_idempotent() {
    let repo = Arc::new(MockRepository::with_conflicts(1));
    *repo.race_winner.lock().await = Some(record("mine", "https://example.com"));
    let svc = service(repo.clone());

    let outcome = svc
        .create_link(request("https://example.com", Some("mine")), &context())
        .await
        .unwrap();

    assert_eq!(
        outcome,
        CreateOutcome::Existing(ShortenedLink {
            slug: "mine".to_string(),
            link: "https://short.example/mine".to_string(),
        })
    );
}

#[tokio::test]
async fn test_custom_slug_race_with_other_url_conflicts() {
    let repo = Arc::new(MockRepository::with_conflicts(1));
    *repo.race_winner.lock().await = Some(record("mine", "https://winner.example"));
    let svc = service(repo);

    let outcome = svc
        .create_link(request("https://example.com", Some("mine")), &context())
        .await
        .unwrap();
    assert_eq!(outcome, CreateOutcome::SlugConflict);
}

// =============================================================================
// 数据库错误
// =============================================================================

#[tokio::test]
async fn test_datastore_error_keeps_text() {
    let svc = service(Arc::new(MockRepository::failing("disk I/O error")));

    let err = svc
        .create_link(request("https://example.com", None), &context())
        .await
        .unwrap_err();

    assert!(matches!(err, LinkforgeError::DatabaseOperation(_)));
    assert_eq!(err.message(), "disk I/O error");
    assert_eq!(err.http_status(), StatusCode::INTERNAL_SERVER_ERROR);
}
