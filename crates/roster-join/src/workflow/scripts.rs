//! Shell scripts and unit-file rendering used by the join steps.
//!
//! Every script is guarded so a rerun on a partially joined node succeeds
//! instead of tripping over its own earlier work.

use roster_model::MasterRecord;

/// Name of the network share the master exports.
pub(crate) const SHARE_NAME: &str = "sambashare";

/// Creates the container privilege group and puts the login user in it.
pub(crate) fn ensure_docker_group() -> String {
    ["sudo groupadd -f docker", "sudo gpasswd -a $USER docker"].join("\n")
}

/// Mounts the master share at `mount_path` and records it in fstab.
pub(crate) fn mount_share(master: &MasterRecord, mount_path: &str) -> String {
    let source = format!("//{}/{}", master.hostname, SHARE_NAME);
    let options = format!(
        "username={},password={}",
        master.username, master.share.password
    );
    let mount = format!("sudo mount -t cifs -o {options} {source} {mount_path}");
    let fstab_line = format!("{source} {mount_path} cifs {options} 0 0");
    let fstab_append = format!("echo '{fstab_line}' | sudo tee -a /etc/fstab");
    [
        format!("mkdir -p {mount_path}"),
        format!("mountpoint -q {mount_path} || {mount}"),
        format!("grep -qs '{source} ' /etc/fstab || {fstab_append}"),
    ]
    .join("\n")
}

/// Reloads the user manager and brings `unit` up now and at boot.
pub(crate) fn start_user_service(unit: &str) -> String {
    [
        "systemctl --user daemon-reload".to_string(),
        format!("systemctl --user start {unit}"),
        format!("systemctl --user enable {unit}"),
        "loginctl enable-linger $USER".to_string(),
    ]
    .join("\n")
}

/// Fills the placeholders a unit template may carry.
pub(crate) fn render_unit(template: &str, home_path: &str, api_server_port: u16) -> String {
    template
        .replace("{home_path}", home_path)
        .replace("{api_server_port}", &api_server_port.to_string())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use roster_model::MasterRecord;

    use super::{ensure_docker_group, mount_share, render_unit, start_user_service};

    fn master() -> MasterRecord {
        serde_json::from_value(json!({
            "hostname": "master0",
            "username": "ops",
            "share": {"password": "s3cret"},
            "api_server": {"port": 51812},
            "store": {"port": 6379},
        }))
        .unwrap()
    }

    #[test]
    fn group_creation_tolerates_an_existing_group() {
        assert!(ensure_docker_group().contains("groupadd -f docker"));
    }

    #[test]
    fn mount_script_is_guarded_and_uses_the_share_credentials() {
        let script = mount_share(&master(), "/home/ops/.roster");
        assert!(script.starts_with("mkdir -p /home/ops/.roster\n"));
        assert!(script.contains("mountpoint -q /home/ops/.roster || sudo mount -t cifs"));
        assert!(script.contains("username=ops,password=s3cret //master0/sambashare"));
        assert!(script.contains("grep -qs '//master0/sambashare ' /etc/fstab"));
        assert!(script.contains("sudo tee -a /etc/fstab"));
    }

    #[test]
    fn service_start_enables_lingering() {
        let script = start_user_service("roster-node-agent.service");
        assert!(script.contains("systemctl --user start roster-node-agent.service"));
        assert!(script.contains("systemctl --user enable roster-node-agent.service"));
        assert!(script.ends_with("loginctl enable-linger $USER"));
    }

    #[test]
    fn unit_rendering_fills_both_placeholders() {
        let rendered = render_unit(
            "ExecStart={home_path}/bin/api-server --port {api_server_port}",
            "/home/ops",
            51812,
        );
        assert_eq!(rendered, "ExecStart=/home/ops/bin/api-server --port 51812");
    }
}
