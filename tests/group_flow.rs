//! Integration tests for static group creation using wiremock.
//!
//! - POST /JSSResource/computergroups/id/0
//! - POST /JSSResource/mobiledevicegroups/id/0

use jss_static_group::client::JssClient;
use jss_static_group::credentials::Credentials;
use jss_static_group::devices::DeviceType;
use jss_static_group::error::JssError;
use jss_static_group::groups::{GroupSpec, create_static_group};
use wiremock::matchers::{body_string, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn mock_client(server: &MockServer) -> JssClient {
    let creds = Credentials {
        username: "user".to_string(),
        password: "pass".to_string(),
    };
    JssClient::new(&server.uri(), &creds).unwrap()
}

#[tokio::test]
async fn create_computer_group_posts_xml_and_returns_id() {
    let server = MockServer::start().await;
    let client = mock_client(&server);
    let spec = GroupSpec::new(DeviceType::Computer, "Lab Macs", ["12", "15"]);

    Mock::given(method("POST"))
        .and(path("/JSSResource/computergroups/id/0"))
        .and(header("content-type", "text/xml"))
        .and(header("authorization", "Basic dXNlcjpwYXNz"))
        .and(body_string(
            "<computer_group><name>Lab Macs</name><is_smart>false</is_smart>\
             <computers><computer><id>12</id></computer><computer><id>15</id></computer></computers>\
             </computer_group>",
        ))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_string("<?xml version=\"1.0\"?><computer_group><id>88</id></computer_group>"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let id = create_static_group(&client, &spec).await.unwrap();
    assert_eq!(id, "88");
}

#[tokio::test]
async fn create_mobile_group_uses_mobile_endpoint() {
    let server = MockServer::start().await;
    let client = mock_client(&server);
    let spec = GroupSpec::new(DeviceType::MobileDevice, "iPads", ["301"]);

    Mock::given(method("POST"))
        .and(path("/JSSResource/mobiledevicegroups/id/0"))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_string("<mobile_device_group><id>9</id></mobile_device_group>"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let id = create_static_group(&client, &spec).await.unwrap();
    assert_eq!(id, "9");
}

#[tokio::test]
async fn duplicate_group_name_is_conflict() {
    let server = MockServer::start().await;
    let client = mock_client(&server);
    let spec = GroupSpec::new(DeviceType::Computer, "Existing", ["1"]);

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(409).set_body_string("Error: Duplicate name"))
        .mount(&server)
        .await;

    let err = create_static_group(&client, &spec).await.unwrap_err();
    match &err {
        JssError::Conflict { body } => assert!(body.contains("Duplicate name")),
        other => panic!("expected Conflict, got {other:?}"),
    }
    assert!(err.to_string().contains("existing group"));
    assert_eq!(err.exit_code(), 1);
}

#[tokio::test]
async fn server_error_on_create_is_server_rejected() {
    let server = MockServer::start().await;
    let client = mock_client(&server);
    let spec = GroupSpec::new(DeviceType::Computer, "Lab", ["1"]);

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&server)
        .await;

    let err = create_static_group(&client, &spec).await.unwrap_err();
    assert!(
        matches!(err, JssError::ServerRejected { status, .. } if status.as_u16() == 500),
        "expected ServerRejected(500), got {err:?}"
    );
}

#[tokio::test]
async fn create_response_without_id_is_malformed() {
    let server = MockServer::start().await;
    let client = mock_client(&server);
    let spec = GroupSpec::new(DeviceType::Computer, "Lab", ["1"]);

    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_string("<computer_group><name>Lab</name></computer_group>"),
        )
        .mount(&server)
        .await;

    let err = create_static_group(&client, &spec).await.unwrap_err();
    assert!(matches!(err, JssError::MalformedResponse(_)));
}

#[tokio::test]
async fn empty_group_is_never_posted() {
    let server = MockServer::start().await;
    let client = mock_client(&server);
    let spec = GroupSpec::new(DeviceType::Computer, "Empty", Vec::<String>::new());

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let err = create_static_group(&client, &spec).await.unwrap_err();
    assert!(matches!(err, JssError::NoResults));
}
