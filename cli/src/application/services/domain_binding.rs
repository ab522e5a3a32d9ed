//! Application service: public domain binding.
//!
//! One entry point per binding mode, plus [`resolve`] which dispatches on
//! [`DomainMode`]. Every function returns a [`DomainResult`]; binding failures
//! are data for the caller to log, never an `Err`.

use std::time::Duration;

use siteship_common::{DomainMode, DomainResult};

use crate::application::ports::{RemoteShell, ToolboxScripts};
use crate::domain::config::missing_script_message;
use crate::domain::remote_output::first_https_url;
use crate::domain::templates::shell_quote;
use crate::domain::validate::{AUTO_DOMAIN_SENTINEL, is_auto_domain, validate_domain};
use crate::domain::{DeployLog, HostRef, ToolboxScript};

/// Deadline for the subdomain registrar script.
pub const REGISTRAR_TIMEOUT: Duration = Duration::from_secs(60);

/// Deadline for the DNS record script.
pub const DNS_TIMEOUT: Duration = Duration::from_secs(30);

/// Deadline for the proxy binding command on the host.
pub const EXPOSE_TIMEOUT: Duration = Duration::from_secs(15);

/// Deadline for installing the reverse proxy on the host.
pub const PROXY_INSTALL_TIMEOUT: Duration = Duration::from_secs(120);

/// Helper installed alongside the reverse proxy that binds a domain to a port.
const EXPOSE_HELPER: &str = "mikrus-expose";

/// Register a shared-domain subdomain pointing at `port`.
///
/// `requested` of `None`, `auto` or `-` asks the registrar to pick a name.
pub async fn bind_subdomain(
    scripts: &impl ToolboxScripts,
    host: &HostRef,
    port: u16,
    requested: Option<&str>,
) -> DomainResult {
    if !scripts.is_available(ToolboxScript::SubdomainRegistrar) {
        return DomainResult::failed(missing_script_message(ToolboxScript::SubdomainRegistrar), None);
    }
    let name = if is_auto_domain(requested) {
        AUTO_DOMAIN_SENTINEL
    } else {
        requested.unwrap_or(AUTO_DOMAIN_SENTINEL)
    };
    if let Err(e) = validate_domain(name) {
        return DomainResult::failed(e.to_string(), None);
    }

    let port_arg = port.to_string();
    tracing::info!(host = %host, domain = name, port, "registering subdomain");
    let out = scripts
        .run(
            ToolboxScript::SubdomainRegistrar,
            &[name, &port_arg, host.as_str()],
            REGISTRAR_TIMEOUT,
        )
        .await;

    if !out.success() {
        let diagnostic = [out.stdout.trim(), out.stderr.trim()]
            .into_iter()
            .find(|s| !s.is_empty())
            .unwrap_or("subdomain registration failed");
        return DomainResult::failed(diagnostic, None);
    }

    let explicit = (name != AUTO_DOMAIN_SENTINEL).then(|| format!("https://{name}"));
    match first_https_url(&out.stdout).or(explicit) {
        Some(url) => {
            let domain = url.strip_prefix("https://").map(str::to_string);
            DomainResult::bound(url, domain)
        }
        None => DomainResult::failed(
            "Subdomain registrar succeeded but did not report the assigned URL.",
            None,
        ),
    }
}

/// Make sure the reverse proxy and its binding helper exist on the host.
///
/// Installation problems are logged as warnings; binding will report the
/// real failure if the helper is still missing.
pub async fn ensure_proxy_runtime(
    shell: &impl RemoteShell,
    scripts: &impl ToolboxScripts,
    host: &HostRef,
    probe_timeout: Duration,
    log: &mut DeployLog,
) {
    let check = shell
        .exec(host, &format!("command -v {EXPOSE_HELPER}"), probe_timeout)
        .await;
    if check.success() {
        return;
    }

    if !scripts.is_available(ToolboxScript::ProxyInstall) {
        log.push(format!(
            "WARNING: Reverse proxy not installed and {} not found.",
            ToolboxScript::ProxyInstall.relative_path()
        ));
        return;
    }
    let source = match scripts.read(ToolboxScript::ProxyInstall) {
        Ok(source) => source,
        Err(e) => {
            log.push(format!("WARNING: Could not read proxy install script: {e:#}"));
            return;
        }
    };

    log.push("Installing reverse proxy...");
    let out = shell
        .exec_with_stdin(host, "bash -s", &source, PROXY_INSTALL_TIMEOUT)
        .await;
    if out.success() {
        log.push("Reverse proxy installed.");
    } else {
        tracing::warn!(host = %host, code = out.exit_code, "proxy install failed");
        log.push(format!("Proxy install warning: {}", out.diagnostic()));
    }
}

/// Bind an owned domain to `port` through the host's reverse proxy.
///
/// The DNS record step is best-effort: its outcome never decides the result.
pub async fn bind_proxy(
    shell: &impl RemoteShell,
    scripts: &impl ToolboxScripts,
    host: &HostRef,
    domain: &str,
    port: u16,
) -> DomainResult {
    if let Err(e) = validate_domain(domain) {
        return DomainResult::failed(e.to_string(), Some(domain.to_string()));
    }
    if domain == AUTO_DOMAIN_SENTINEL {
        return DomainResult::failed(
            "Proxy mode cannot assign a domain automatically. Pass an explicit domain.",
            None,
        );
    }

    if scripts.is_available(ToolboxScript::DnsRecord) {
        let dns = scripts
            .run(ToolboxScript::DnsRecord, &[domain, host.as_str()], DNS_TIMEOUT)
            .await;
        if !dns.success() {
            tracing::warn!(domain, code = dns.exit_code, "DNS record step failed, continuing");
        }
    }

    let command = format!(
        "command -v {EXPOSE_HELPER} >/dev/null 2>&1 && {EXPOSE_HELPER} {} {}",
        shell_quote(domain),
        shell_quote(&port.to_string())
    );
    let out = shell.exec(host, &command, EXPOSE_TIMEOUT).await;
    if out.success() {
        DomainResult::bound(format!("https://{domain}"), Some(domain.to_string()))
    } else {
        DomainResult::failed(
            format!(
                "{EXPOSE_HELPER} failed or not found. Install the reverse proxy first ({}). {}",
                ToolboxScript::ProxyInstall.relative_path(),
                out.stderr.trim()
            )
            .trim_end()
            .to_string(),
            Some(domain.to_string()),
        )
    }
}

/// Dispatch on the binding mode. Proxy mode installs the proxy first if needed.
#[allow(clippy::too_many_arguments)]
pub async fn resolve(
    shell: &impl RemoteShell,
    scripts: &impl ToolboxScripts,
    host: &HostRef,
    mode: DomainMode,
    domain: Option<&str>,
    port: u16,
    probe_timeout: Duration,
    log: &mut DeployLog,
) -> DomainResult {
    match mode {
        DomainMode::Subdomain => bind_subdomain(scripts, host, port, domain).await,
        DomainMode::Proxy => {
            let Some(domain) = domain.filter(|d| !is_auto_domain(Some(*d))) else {
                return DomainResult::failed(
                    "Proxy mode requires a domain (e.g. --domain app.example.com).",
                    None,
                );
            };
            ensure_proxy_runtime(shell, scripts, host, probe_timeout, log).await;
            bind_proxy(shell, scripts, host, domain, port).await
        }
        DomainMode::LocalOnly => DomainResult::local_only(Some(port)),
    }
}
