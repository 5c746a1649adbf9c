//! Realistic runtime output fed through the clients' parse functions.
//!
//! The samples mirror what each CLI actually prints, so these tests pin the
//! full normalization path from raw stdout to the shared schema.

use container_client::clients::{ContainerClient, DockerClient, FinchClient, PodmanClient};
use container_client::contracts::options::{ListContainersOptions, ListVolumesOptions, PruneImagesOptions};
use container_client::contracts::types::Protocol;

#[test]
fn docker_container_listing_normalizes_ports_and_labels() {
    let output = concat!(
        r#"{"ID":"11aa22bb","Names":"web","Image":"registry.example.com/team/app:2.1","#,
        r#""Ports":"0.0.0.0:8080->80/tcp, 443/tcp","Networks":"frontend,backend","#,
        r#""Labels":"tier=web,owner=ops","CreatedAt":"2024-03-05 10:00:00 +0000 UTC","#,
        r#""State":"running","Status":"Up 2 hours"}"#,
        "\n",
        r#"{"ID":"33cc44dd","Names":"db","Image":"postgres:16","Ports":"","Networks":"backend","#,
        r#""Labels":"","CreatedAt":"2024-03-04 09:30:00 +0000 UTC","State":"exited","#,
        r#""Status":"Exited (0) 3 hours ago"}"#,
        "\n"
    );
    let response = DockerClient
        .list_containers(&ListContainersOptions::default())
        .unwrap();
    let items = (response.parse)(output, true).unwrap();
    assert_eq!(items.len(), 2);

    let web = &items[0];
    assert_eq!(web.name, "web");
    assert_eq!(web.image.registry.as_deref(), Some("registry.example.com"));
    assert_eq!(web.image.image.as_deref(), Some("team/app"));
    assert_eq!(web.image.tag.as_deref(), Some("2.1"));
    assert_eq!(web.ports.len(), 2);
    assert_eq!(web.ports[0].host_ip.as_deref(), Some("0.0.0.0"));
    assert_eq!(web.ports[0].host_port, Some(8080));
    assert_eq!(web.ports[0].container_port, 80);
    assert_eq!(web.ports[0].protocol, Some(Protocol::Tcp));
    assert_eq!(web.ports[1].host_port, None);
    assert_eq!(web.networks, ["frontend", "backend"]);
    assert_eq!(web.labels.get("tier").map(String::as_str), Some("web"));
    assert_eq!(web.state, "running");

    let db = &items[1];
    assert!(db.ports.is_empty());
    assert!(db.labels.is_empty());
    assert_eq!(db.state, "exited");
    assert_eq!(db.status.as_deref(), Some("Exited (0) 3 hours ago"));
}

#[test]
fn lenient_mode_drops_the_malformed_record_only() {
    let output = concat!(
        r#"{"ID":"good","Names":"a","Image":"alpine","CreatedAt":"2024-03-05 10:00:00 +0000 UTC","State":"running"}"#,
        "\n",
        "not json at all\n",
    );
    let response = DockerClient
        .list_containers(&ListContainersOptions::default())
        .unwrap();
    let items = (response.parse)(output, false).unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].id, "good");

    assert!(
        (response.parse)(output, true).is_err(),
        "strict mode must fail on the malformed record"
    );
}

#[test]
fn podman_volume_listing_is_double_encoded() {
    // podman wraps each volume record in a JSON string inside a JSON array
    let output = r#"["{\"Name\":\"data\",\"Driver\":\"local\",\"Mountpoint\":\"/var/lib/v\",\"Labels\":{\"app\":\"db\"}}"]"#;
    let response = PodmanClient
        .list_volumes(&ListVolumesOptions::default())
        .unwrap();
    let items = (response.parse)(output, true).unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].name, "data");
    assert_eq!(items[0].labels.get("app").map(String::as_str), Some("db"));
}

#[test]
fn image_prune_outputs_diverge_between_docker_and_podman() {
    let docker_output = "\
untagged: alpine:3.17
deleted: sha256:aaaa1111
Total reclaimed space: 62.95MB
";
    let response = DockerClient.prune_images(&PruneImagesOptions::default()).unwrap();
    let result = (response.parse)(docker_output, false).unwrap();
    assert_eq!(result.deleted, ["aaaa1111"]);
    assert_eq!(result.space_reclaimed, Some(66_007_859));

    // podman prints bare IDs and no summary
    let podman_output = "aaaa1111\nbbbb2222\n";
    let response = PodmanClient.prune_images(&PruneImagesOptions::default()).unwrap();
    let result = (response.parse)(podman_output, false).unwrap();
    assert_eq!(result.deleted, ["aaaa1111", "bbbb2222"]);
    assert_eq!(result.space_reclaimed, None);
}

#[test]
fn version_shapes_per_runtime() {
    let docker_output =
        r#"{"Client":{"ApiVersion":"1.43"},"Server":{"ApiVersion":"1.43"}}"#;
    let response = DockerClient.version().unwrap();
    let version = (response.parse)(docker_output, true).unwrap();
    assert_eq!(version.client, "1.43");
    assert_eq!(version.server.as_deref(), Some("1.43"));

    let podman_output =
        r#"{"Client":{"APIVersion":"4.9.0"},"Server":{"APIVersion":"4.9.0"}}"#;
    let response = PodmanClient.version().unwrap();
    let version = (response.parse)(podman_output, true).unwrap();
    assert_eq!(version.client, "4.9.0");

    let finch_output = r#"{"Client":{"Version":"v1.1.1"},"Server":{"Components":[{"Name":"containerd","Version":"v1.7.11"}]}}"#;
    let response = FinchClient::new().version().unwrap();
    let version = (response.parse)(finch_output, true).unwrap();
    assert_eq!(version.client, "v1.1.1");
    assert_eq!(version.server.as_deref(), Some("v1.7.11"));
}
