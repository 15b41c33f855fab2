//! Embedded HTML/CSS/JS frontend for the seodash web dashboard.
//!
//! The entire page is compiled into the binary as a string constant and
//! talks to the JSON API only. It renders whatever `/api/dashboard`
//! returns; all session logic lives on the server.

/// The complete single-page dashboard HTML.
pub const INDEX_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>seodash</title>
<style>
:root {
  --bg: #0d1117;
  --surface: #161b22;
  --border: #30363d;
  --text: #e6edf3;
  --text-muted: #8b949e;
  --accent: #58a6ff;
  --green: #3fb950;
  --yellow: #d29922;
  --red: #f85149;
  --purple: #bc8cff;
  --cyan: #39d2c0;
  --radius: 8px;
  --font: -apple-system, BlinkMacSystemFont, 'Segoe UI', Helvetica, Arial, sans-serif;
  --mono: 'SF Mono', 'Cascadia Code', 'Fira Code', monospace;
}

* { margin: 0; padding: 0; box-sizing: border-box; }
body {
  background: var(--bg);
  color: var(--text);
  font-family: var(--font);
  font-size: 14px;
  line-height: 1.5;
}

.app { max-width: 1200px; margin: 0 auto; padding: 24px; }

header {
  display: flex;
  align-items: center;
  justify-content: space-between;
  margin-bottom: 24px;
  padding-bottom: 16px;
  border-bottom: 1px solid var(--border);
}
header h1 { font-size: 24px; font-weight: 600; }
header h1 .logo { color: var(--accent); font-family: var(--mono); }

.pill {
  display: inline-block;
  padding: 2px 10px;
  border-radius: 12px;
  font-size: 12px;
  border: 1px solid var(--border);
  margin-left: 8px;
}
.pill.ok { color: var(--green); border-color: var(--green); }
.pill.bad { color: var(--red); border-color: var(--red); }

.grid { display: grid; grid-template-columns: repeat(4, 1fr); gap: 16px; margin-bottom: 24px; }
.card {
  background: var(--surface);
  border: 1px solid var(--border);
  border-radius: var(--radius);
  padding: 16px;
}
.card h3 { font-size: 15px; margin-bottom: 8px; }
.card .stat { font-size: 22px; font-family: var(--mono); color: var(--cyan); }
.card .muted { color: var(--text-muted); font-size: 12px; }
.card .badge-running { color: var(--yellow); }
.card .badge-active { color: var(--green); }
.card button[disabled] { opacity: 0.4; cursor: not-allowed; }

input, button {
  font: inherit;
  color: var(--text);
  background: var(--bg);
  border: 1px solid var(--border);
  border-radius: 6px;
  padding: 6px 10px;
}
button { cursor: pointer; }
button:hover { border-color: var(--accent); }
.row { display: flex; gap: 8px; margin-bottom: 12px; }
.row input { flex: 1; }

.log {
  font-family: var(--mono);
  font-size: 12px;
  max-height: 420px;
  overflow-y: auto;
}
.log div { padding: 2px 0; border-bottom: 1px solid #1c2128; }
.log .system { color: var(--purple); }
.log .info { color: var(--accent); }
.log .success { color: var(--green); }
.log .warning { color: var(--yellow); }
.log .error { color: var(--red); }
.log .security { color: var(--cyan); }
.log .tool { color: var(--text); }

.toasts { position: fixed; top: 16px; right: 16px; display: flex; flex-direction: column; gap: 8px; }
.toast {
  background: var(--surface);
  border-left: 4px solid var(--accent);
  padding: 10px 14px;
  border-radius: 6px;
  cursor: pointer;
}
.toast.success { border-color: var(--green); }
.toast.warning { border-color: var(--yellow); }
.toast.error { border-color: var(--red); }
</style>
</head>
<body>
<div class="app">
  <header>
    <h1><span class="logo">seodash</span> SEO Tools</h1>
    <div>
      <span id="mode" class="pill"></span>
      <span id="conn" class="pill"></span>
    </div>
  </header>

  <div class="row">
    <input id="url" placeholder="https://www.tokopedia.com/shop/product">
  </div>

  <div id="tools" class="grid"></div>

  <div class="grid">
    <div class="card"><h3>Click Sessions</h3><div id="clicks" class="stat"></div><div id="boost" class="muted"></div></div>
    <div class="card"><h3>Campaign Runs</h3><div id="campaigns" class="stat"></div></div>
    <div class="card"><h3>Security Score</h3><div id="score" class="stat"></div><div id="risk" class="muted"></div></div>
    <div class="card"><h3>Backend Tools</h3><div id="backendTools" class="muted"></div></div>
  </div>

  <div class="card">
    <div class="row">
      <input id="command" placeholder="Type a command (help)">
      <button onclick="sendCommand()">Run</button>
      <button onclick="post('/api/logs/clear')">Clear</button>
      <button id="pause" onclick="togglePause()">Pause</button>
      <button onclick="exportLogs()">Export</button>
    </div>
    <div id="log" class="log"></div>
  </div>
</div>
<div id="toasts" class="toasts"></div>

<script>
let state = null;

async function refresh() {
  const res = await fetch('/api/dashboard');
  state = await res.json();
  render();
}

async function post(path, body) {
  await fetch(path, {
    method: 'POST',
    headers: { 'Content-Type': 'application/json' },
    body: JSON.stringify(body || {}),
  });
  await refresh();
}

function esc(s) {
  const d = document.createElement('div');
  d.textContent = s == null ? '' : String(s);
  return d.innerHTML;
}

function render() {
  const s = state;
  document.getElementById('mode').textContent = s.mode_label;
  const conn = document.getElementById('conn');
  conn.textContent = s.connection.connected ? 'Connected' : 'Disconnected';
  conn.className = 'pill ' + (s.connection.connected ? 'ok' : 'bad');

  document.getElementById('tools').innerHTML = s.tools.map(t => `
    <div class="card">
      <h3>${esc(t.display_name)}</h3>
      <div class="badge-${t.badge}">${t.badge === 'running' ? 'Running' : 'Active'}</div>
      <button ${t.available ? '' : 'disabled'} onclick="startTool('${t.key}')">Start</button>
    </div>`).join('');

  const sb = s.scoreboard;
  document.getElementById('clicks').textContent = sb.click_sessions.toLocaleString();
  document.getElementById('boost').textContent = '+' + sb.click_boost_pct + '% boost';
  document.getElementById('campaigns').textContent = sb.campaign_runs;
  document.getElementById('score').textContent = sb.security_score + '%';
  document.getElementById('risk').textContent = 'Risk: ' + sb.risk_level;
  document.getElementById('backendTools').textContent =
    s.connection.backend_tools.map(t => t.name + ' (' + t.status + ')').join(', ') || 'n/a';

  document.getElementById('pause').textContent = s.paused ? 'Resume' : 'Pause';
  document.getElementById('log').innerHTML = s.logs.map(e =>
    `<div class="${e.type}">[${esc(e.timestamp)}] ${e.type.toUpperCase()}: ${esc(e.message)}</div>`
  ).join('');

  document.getElementById('toasts').innerHTML = s.notifications.map(n =>
    `<div class="toast ${n.level}" onclick="post('/api/notifications/${n.id}/dismiss')">${esc(n.message)}</div>`
  ).join('');
}

function startTool(key) {
  post('/api/tools/' + key + '/start', { url: document.getElementById('url').value.trim() });
}

function sendCommand() {
  const input = document.getElementById('command');
  const command = input.value;
  input.value = '';
  post('/api/command', { command });
}

function togglePause() {
  post(state && state.paused ? '/api/logs/resume' : '/api/logs/pause');
}

async function exportLogs() {
  const res = await fetch('/api/logs/export');
  if (res.ok) {
    const disposition = res.headers.get('Content-Disposition') || '';
    const match = disposition.match(/filename="([^"]+)"/);
    const blob = await res.blob();
    const a = document.createElement('a');
    a.href = URL.createObjectURL(blob);
    a.download = match ? match[1] : 'seo-tools-logs.txt';
    a.click();
    URL.revokeObjectURL(a.href);
  }
  await refresh();
}

document.getElementById('command').addEventListener('keydown', e => {
  if (e.key === 'Enter') sendCommand();
});

refresh();
setInterval(refresh, 1000);
</script>
</body>
</html>
"##;
