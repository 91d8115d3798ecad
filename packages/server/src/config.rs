//! Command line / environment configuration for the server binary.

use clap::Parser;

use crate::domain::UserId;

/// A one-time custom token pre-issued for a known user (`TOKEN=UID`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomTokenArg {
    pub token: String,
    pub user_id: UserId,
}

fn parse_custom_token(raw: &str) -> Result<CustomTokenArg, String> {
    let (token, uid) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected TOKEN=UID, got '{raw}'"))?;
    if token.is_empty() {
        return Err("custom token cannot be empty".to_string());
    }
    let user_id = UserId::new(uid.to_string()).map_err(|e| e.to_string())?;
    Ok(CustomTokenArg {
        token: token.to_string(),
        user_id,
    })
}

/// Identity service and document store for the coachdesk site.
#[derive(Debug, Clone, Parser)]
#[command(name = "coachdesk-server", version, about)]
pub struct ServerArgs {
    /// Address to bind
    #[arg(long, env = "COACHDESK_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, env = "COACHDESK_PORT", default_value_t = 8080)]
    pub port: u16,

    /// Pre-issued one-time custom token, `TOKEN=UID` (repeatable)
    #[arg(
        long = "custom-token",
        env = "COACHDESK_CUSTOM_TOKENS",
        value_delimiter = ',',
        value_parser = parse_custom_token
    )]
    pub custom_tokens: Vec<CustomTokenArg>,

    /// Default log level when RUST_LOG is not set
    #[arg(long, env = "COACHDESK_LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

impl ServerArgs {
    /// `host:port` to bind
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_defaults() {
        // テスト項目: 引数なしでデフォルト値が使われる
        // when (操作):
        let args = ServerArgs::try_parse_from(["coachdesk-server"]).unwrap();

        // then (期待する結果):
        assert_eq!(args.bind_address(), "127.0.0.1:8080");
        assert!(args.custom_tokens.is_empty());
    }

    #[test]
    fn test_parse_custom_tokens() {
        // テスト項目: TOKEN=UID 形式のカスタムトークンを複数指定できる
        // when (操作):
        let args = ServerArgs::try_parse_from([
            "coachdesk-server",
            "--custom-token",
            "abc=coach",
            "--custom-token",
            "def=client-7",
            "--port",
            "9000",
        ])
        .unwrap();

        // then (期待する結果):
        assert_eq!(args.port, 9000);
        assert_eq!(args.custom_tokens.len(), 2);
        assert_eq!(args.custom_tokens[0].token, "abc");
        assert_eq!(args.custom_tokens[1].user_id.as_str(), "client-7");
    }

    #[test]
    fn test_parse_custom_token_without_separator_fails() {
        // テスト項目: '=' のないカスタムトークン指定はエラーになる
        // when (操作):
        let result = ServerArgs::try_parse_from(["coachdesk-server", "--custom-token", "abc"]);

        // then (期待する結果):
        assert!(result.is_err());
    }
}
