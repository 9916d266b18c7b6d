use chrono::{TimeZone, Utc};
use memento_links::{ClientConfig, Error, Resource, Timemap, LINK_FORMAT_ACCEPT};
use pretty_assertions::assert_eq;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TIMEMAP: &str = r#"<http://a.example.org>;rel="original",
</timemap/http://a.example.org>;rel="self";type="application/link-format",
</timegate/http://a.example.org>;rel="timegate",
</web/20000620180259/http://a.example.org>
  ;rel="first last memento";datetime="2000-06-20T00:00:00Z""#;

fn resource(server: &MockServer, path: &str) -> Resource {
    Resource::new(format!("{}{path}", server.uri()), &ClientConfig::default()).unwrap()
}

#[tokio::test]
async fn timemap_from_uri_uses_uri_as_base() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/timemap/http://a.example.org"))
        .and(header("accept", LINK_FORMAT_ACCEPT))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "application/link-format")
                .set_body_string(TIMEMAP),
        )
        .expect(1)
        .mount(&server)
        .await;

    let uri_t = format!("{}/timemap/http://a.example.org", server.uri());
    let tm = Timemap::from_uri(&uri_t, &ClientConfig::default())
        .await
        .unwrap();

    assert_eq!(tm.original_uri.as_deref(), Some("http://a.example.org"));
    assert_eq!(tm.self_link().unwrap().uri_t, uri_t);
    assert_eq!(
        tm.timegate_uris,
        [format!("{}/timegate/http://a.example.org", server.uri())]
    );
    let memento = tm.first_memento().unwrap();
    assert_eq!(
        memento.uri_m,
        format!("{}/web/20000620180259/http://a.example.org", server.uri())
    );
    assert_eq!(
        memento.datetime,
        Utc.with_ymd_and_hms(2000, 6, 20, 18, 2, 59).unwrap()
    );
}

#[tokio::test]
async fn timemap_fetch_failure_is_surfaced() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let uri_t = format!("{}/timemap/x", server.uri());
    let result = Timemap::from_uri(&uri_t, &ClientConfig::default()).await;
    match result {
        Err(Error::Http(e)) => assert_eq!(e.status().map(|s| s.as_u16()), Some(404)),
        other => panic!("unexpected result {other:?}"),
    }
}

#[tokio::test]
async fn resource_relations_come_from_one_cached_head() {
    let server = MockServer::start().await;
    let link = concat!(
        r#"</timegate/page>; rel="timegate", "#,
        r#"</timemap/page>; rel="timemap"; type="application/link-format""#,
    );
    Mock::given(method("HEAD"))
        .and(path("/page"))
        .respond_with(ResponseTemplate::new(200).insert_header("link", link))
        .expect(1)
        .mount(&server)
        .await;

    let mut resource = resource(&server, "/page");
    assert_eq!(
        resource.timegate_uri().await.unwrap(),
        Some(format!("{}/timegate/page", server.uri()))
    );
    assert_eq!(
        resource.timemap_uri().await.unwrap(),
        Some(format!("{}/timemap/page", server.uri()))
    );
    assert_eq!(resource.original_uri().await.unwrap(), None);
    assert!(!resource.is_timegate().await.unwrap());
    assert_eq!(resource.memento_datetime().await.unwrap(), None);
}

#[tokio::test]
async fn refresh_issues_a_new_request() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .and(path("/page"))
        .respond_with(ResponseTemplate::new(200))
        .expect(2)
        .mount(&server)
        .await;

    let mut resource = resource(&server, "/page");
    resource.headers().await.unwrap();
    resource.headers().await.unwrap();
    resource.refresh().await.unwrap();
}

#[tokio::test]
async fn resource_acting_as_its_own_timegate() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .and(path("/tg"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header(
                    "link",
                    r#"<http://a.example.org>; rel="original", </tg>; rel="timegate""#,
                ),
        )
        .mount(&server)
        .await;

    let mut resource = resource(&server, "/tg");
    assert!(resource.is_timegate().await.unwrap());
    assert_eq!(
        resource.original_uri().await.unwrap().as_deref(),
        Some("http://a.example.org")
    );
}

#[tokio::test]
async fn memento_reports_its_datetime() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .and(path("/web/20000621011731/http://a.example.org"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("memento-datetime", "Wed, 21 Jun 2000 01:17:31 GMT")
                .insert_header("link", "<http://a.example.org>; rel=\"original\""),
        )
        .mount(&server)
        .await;

    let mut resource = resource(&server, "/web/20000621011731/http://a.example.org");
    assert_eq!(
        resource.memento_datetime().await.unwrap(),
        Some(Utc.with_ymd_and_hms(2000, 6, 21, 1, 17, 31).unwrap())
    );
    assert_eq!(resource.timegate_uri().await.unwrap(), None);
}

#[tokio::test]
async fn head_failure_is_surfaced() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let mut resource = resource(&server, "/page");
    assert!(matches!(resource.timegate_uri().await, Err(Error::Http(_))));
}

#[tokio::test]
async fn timegate_redirect_is_not_followed() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .and(path("/tg"))
        .respond_with(
            ResponseTemplate::new(302)
                .insert_header("location", "/m")
                .insert_header(
                    "link",
                    r#"<http://a.example.org>; rel="original", </tg>; rel="timegate""#,
                ),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("HEAD"))
        .and(path("/m"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("memento-datetime", "Wed, 21 Jun 2000 01:17:31 GMT")
                .insert_header("link", r#"<http://other.example.org>; rel="original""#),
        )
        .expect(0)
        .mount(&server)
        .await;

    let mut resource = resource(&server, "/tg");
    assert_eq!(resource.memento_datetime().await.unwrap(), None);
    assert_eq!(
        resource.original_uri().await.unwrap().as_deref(),
        Some("http://a.example.org")
    );
    assert!(resource.is_timegate().await.unwrap());
}

#[tokio::test]
async fn unquoted_relation_in_link_header() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .and(path("/page"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("link", "<http://tg.example.org/tg>; rel=timegate"),
        )
        .mount(&server)
        .await;

    let mut resource = resource(&server, "/page");
    assert_eq!(
        resource.timegate_uri().await.unwrap().as_deref(),
        Some("http://tg.example.org/tg")
    );
}
