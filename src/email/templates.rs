pub fn render_password_reset(reset_url: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"></head>
<body style="font-family: sans-serif; max-width: 600px; margin: 0 auto; padding: 20px;">
    <h2>Forgot your password?</h2>
    <p>Somebody asked to reset the password of the account registered with this address.</p>
    <p><a href="{reset_url}" style="display: inline-block; padding: 10px 20px; background: #4f46e5; color: white; text-decoration: none; border-radius: 4px;">Choose a new password</a></p>
    <p style="color: #666; font-size: 14px;">The link works once and expires soon. If you did not ask for it, ignore this email; your password stays unchanged.</p>
</body>
</html>"#
    )
}
