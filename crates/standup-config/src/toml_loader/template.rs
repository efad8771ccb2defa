//! Default TOML config template with inline documentation comments.

/// Generate the default TOML config content with comments.
pub(crate) fn default_config_toml() -> String {
    r##"# Standup helper configuration
# Schema version 1
# Only override what you want to change -- missing fields use defaults.
# SUPABASE_URL, SUPABASE_ANON_KEY and STANDUP_SERVER_URL override the values below.

[supabase]
url = ""
api_key = ""
# schema = "public"
# participants_table = "people"
# config_table = "config"
# request_timeout = 30     # 1-300 seconds

[realtime]
# heartbeat_interval = 25   # 5-120
# reconnect_delay = 1       # 1-60
# max_reconnect_delay = 30  # 1-600

[server]
# bind = "0.0.0.0"
# port = 3000
# public_url = "http://localhost:3000"

[gate]
# cookie_name = "is_authenticated"
# password_key = "password"
# min_password_length = 8   # 1-100
# max_password_length = 100 # 1-1000

[room]
# placeholder_prefix = "John Doe"
# leave_grace_ms = 500        # 0-10000
# notification_capacity = 8   # 1-64

[logging]
# level = "info"   # trace, debug, info, warn, error
# json = false
"##
    .to_string()
}
