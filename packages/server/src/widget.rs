//! Publish widget injected into every served page

/// Container id of the injected widget; the editor treats it as UI chrome
pub const PUBLISH_WIDGET_ID: &str = "beacon-publish-widget";

/// Markup and script appended to each page. The button posts to
/// `/publish` and reports the reply inline.
pub const PUBLISH_WIDGET: &str = r#"<div id="beacon-publish-widget" style="position:fixed;bottom:20px;left:20px;z-index:99999;font-family:system-ui,sans-serif;">
  <button type="button" id="beacon-publish-btn" style="padding:10px 18px;border:none;border-radius:6px;background:#16a34a;color:#fff;font-size:14px;cursor:pointer;">Publish</button>
  <span id="beacon-publish-status" style="margin-left:10px;font-size:13px;"></span>
</div>
<script>
(function () {
  var button = document.getElementById('beacon-publish-btn');
  var status = document.getElementById('beacon-publish-status');
  button.addEventListener('click', function () {
    button.disabled = true;
    status.textContent = 'Publishing...';
    fetch('/publish', { method: 'POST' })
      .then(function (res) { return res.json(); })
      .then(function (reply) {
        status.textContent = reply.message;
        status.style.color = reply.success ? '#16a34a' : '#dc2626';
      })
      .catch(function (err) {
        status.textContent = 'Publish failed: ' + err;
        status.style.color = '#dc2626';
      })
      .finally(function () { button.disabled = false; });
  });
})();
</script>
"#;

/// Insert the widget right before the last `</body>`, or append it when the
/// page has no body close tag.
pub fn inject_publish_widget(html: &str) -> String {
    let mut output = String::with_capacity(html.len() + PUBLISH_WIDGET.len());
    match html.rfind("</body>") {
        Some(index) => {
            output.push_str(&html[..index]);
            output.push_str(PUBLISH_WIDGET);
            output.push_str(&html[index..]);
        }
        None => {
            output.push_str(html);
            output.push_str(PUBLISH_WIDGET);
        }
    }
    output
}
