#[cfg(test)]
mod tests {
    use std::ffi::OsString;
    use std::path::PathBuf;
    use std::process::Stdio;
    use std::sync::OnceLock;
    use std::time::Duration;

    use anyhow::{Context, Result, bail};
    use reqwest::StatusCode;
    use tokio::process::{Child, Command};
    use tokio::time::sleep;

    #[tokio::test]
    async fn health_and_user_listing_against_live_backend() -> Result<()> {
        let bind = "127.0.0.1:19180";
        let base_url = format!("http://{bind}");
        let mut backend = start_backend(bind).await?;

        let result = async {
            let health = run_cli(&["--api-base", &base_url, "health"]).await?;
            assert!(health.contains("✅ Healthy"));
            assert!(health.contains("Backend health check: HEALTHY"));

            let users = run_cli(&["--api-base", &base_url, "users"]).await?;
            assert!(users.contains("Alice Johnson"));
            assert!(users.contains("charlie@example.com"));
            assert!(users.contains("Loaded 3 users successfully"));

            let user = run_cli(&["--api-base", &base_url, "user", "2"]).await?;
            let parsed: serde_json::Value = serde_json::from_str(&user)?;
            assert_eq!(parsed["name"], "Bob Smith");
            Ok::<(), anyhow::Error>(())
        }
        .await;

        stop_process(&mut backend).await;
        result
    }

    #[tokio::test]
    async fn add_user_then_list_against_live_backend() -> Result<()> {
        let bind = "127.0.0.1:19181";
        let base_url = format!("http://{bind}");
        let mut backend = start_backend(bind).await?;

        let result = async {
            let output = run_cli(&[
                "--api-base",
                &base_url,
                "add-user",
                "--name",
                " Dana ",
                "--email",
                "dana@example.com",
            ])
            .await?;
            assert!(output.contains("✅ Added user: Dana (dana@example.com)"));
            assert!(output.contains("Loaded 4 users successfully"));

            let duplicate = run_cli(&[
                "--api-base",
                &base_url,
                "add-user",
                "--name",
                "Dana",
                "--email",
                "dana@example.com",
            ])
            .await?;
            assert!(duplicate.contains("❌ Failed to add user: email already exists"));

            let blank = run_cli(&["--api-base", &base_url, "add-user", "--email", "x@y.z"]).await?;
            assert!(blank.contains("Please enter both name and email"));
            Ok::<(), anyhow::Error>(())
        }
        .await;

        stop_process(&mut backend).await;
        result
    }

    #[tokio::test]
    async fn safe_calculation_then_crash_kills_backend() -> Result<()> {
        let bind = "127.0.0.1:19182";
        let base_url = format!("http://{bind}");
        let mut backend = start_backend(bind).await?;

        let result = async {
            let calc = run_cli(&["--api-base", &base_url, "calc"]).await?;
            assert!(calc.contains("100 / 5 = 20"));

            let crash = run_cli(&[
                "--api-base",
                &base_url,
                "--crash-recheck-millis",
                "200",
                "crash",
            ])
            .await?;
            assert!(crash.contains("💥 CRASH TRIGGERED!"));
            assert!(crash.contains("❌ Offline"));
            assert_eq!(crash.matches("Backend health check failed").count(), 1);

            wait_for_exit(&mut backend, 40).await
        }
        .await;

        stop_process(&mut backend).await;
        result
    }

    #[tokio::test]
    async fn web_dashboard_serves_page_and_ping() -> Result<()> {
        let bind = "127.0.0.1:19183";
        let backend_bind = "127.0.0.1:19184";
        let mut backend = start_backend(backend_bind).await?;
        let mut web = start_cli_web(bind, &format!("http://{backend_bind}")).await?;

        let result = async {
            let page = reqwest::get(format!("http://{bind}/"))
                .await
                .context("failed to load dashboard page")?
                .error_for_status()?
                .text()
                .await?;
            assert!(page.contains("faultline dashboard"));
            assert!(page.contains("Frontend application started"));
            assert!(page.contains("Alice Johnson"));
            Ok::<(), anyhow::Error>(())
        }
        .await;

        stop_process(&mut web).await;
        stop_process(&mut backend).await;
        result
    }

    async fn start_backend(bind: &str) -> Result<Child> {
        let backend_bin = binary_path("demo-backend")?;

        let child = Command::new(backend_bin)
            .env("FAULTLINE_BACKEND_BIND", bind)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .context("failed to spawn demo-backend")?;

        wait_for_url_status(&format!("http://{bind}/health"), StatusCode::OK, 40).await?;
        Ok(child)
    }

    async fn start_cli_web(bind: &str, api_base: &str) -> Result<Child> {
        let cli_bin = binary_path("cli-client")?;

        let child = Command::new(cli_bin)
            .arg("--api-base")
            .arg(api_base)
            .arg("serve-web")
            .arg("--bind")
            .arg(bind)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .context("failed to spawn cli-client serve-web")?;

        wait_for_url_status(&format!("http://{bind}/api/ping"), StatusCode::OK, 40).await?;
        Ok(child)
    }

    async fn run_cli(args: &[&str]) -> Result<String> {
        let cli_bin = binary_path("cli-client")?;
        let output = Command::new(cli_bin)
            .args(args)
            .output()
            .await
            .context("failed to execute cli-client")?;

        if !output.status.success() {
            bail!(
                "cli-client failed: {}",
                String::from_utf8_lossy(&output.stderr)
            );
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }

    async fn wait_for_url_status(url: &str, expected: StatusCode, retries: usize) -> Result<()> {
        let http = reqwest::Client::new();

        for _ in 0..retries {
            if let Ok(resp) = http.get(url).send().await
                && resp.status() == expected
            {
                return Ok(());
            }
            sleep(Duration::from_millis(100)).await;
        }

        bail!("service did not return {expected} at {url}");
    }

    async fn wait_for_exit(child: &mut Child, retries: usize) -> Result<()> {
        for _ in 0..retries {
            if child.try_wait()?.is_some() {
                return Ok(());
            }
            sleep(Duration::from_millis(100)).await;
        }

        bail!("demo-backend is still running after the crash request");
    }

    async fn stop_process(child: &mut Child) {
        let _ = child.kill().await;
        let _ = child.wait().await;
    }

    fn binary_path(name: &str) -> Result<PathBuf> {
        let workspace_root = workspace_root()?;
        ensure_binaries_built(&workspace_root)?;
        let mut path = workspace_root.join("target").join("debug").join(name);

        if let Some(suffix) = std::env::consts::EXE_SUFFIX.strip_prefix('.') {
            let mut filename = OsString::from(name);
            filename.push(".");
            filename.push(suffix);
            path = workspace_root.join("target").join("debug").join(filename);
        }

        if !path.exists() {
            bail!("expected binary does not exist: {}", path.display());
        }

        Ok(path)
    }

    fn workspace_root() -> Result<PathBuf> {
        let crate_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
        crate_dir
            .parent()
            .and_then(|p| p.parent())
            .map(PathBuf::from)
            .context("failed to resolve workspace root")
    }

    fn build_required_binaries(workspace_root: &PathBuf) -> Result<()> {
        let status = std::process::Command::new("cargo")
            .arg("build")
            .arg("-p")
            .arg("demo-backend")
            .arg("-p")
            .arg("cli-client")
            .current_dir(workspace_root)
            .status()
            .context("failed to run cargo build for system test binaries")?;

        if !status.success() {
            bail!("cargo build for system test binaries failed");
        }

        Ok(())
    }

    fn ensure_binaries_built(workspace_root: &PathBuf) -> Result<()> {
        static BUILD_RESULT: OnceLock<std::result::Result<(), String>> = OnceLock::new();

        let result = BUILD_RESULT.get_or_init(|| {
            build_required_binaries(workspace_root).map_err(|err| err.to_string())
        });

        if let Err(message) = result {
            bail!("failed to build required binaries: {message}");
        }

        Ok(())
    }
}
