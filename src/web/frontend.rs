//! Embedded HTML/CSS/JS frontend for the salesboard dashboard.
//!
//! The entire SPA is compiled into the binary as a string constant.
//! No external assets, no build tools, no CDN dependencies. Charts are drawn
//! from the server's chart specifications as plain DOM bars; the page holds
//! no filter state of its own, only the per-chart click signals.

/// The complete single-page dashboard HTML.
pub const INDEX_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Sales Dashboard</title>
<style>
:root {
  --bg: #f4f6fb;
  --surface: #ffffff;
  --border: #e3e6ef;
  --text: #1f2330;
  --text-muted: #6b7080;
  --header-from: #182848;
  --header-to: #4b6cb7;
  --radius: 10px;
  --font: -apple-system, BlinkMacSystemFont, 'Segoe UI', Helvetica, Arial, sans-serif;
}

* { margin: 0; padding: 0; box-sizing: border-box; }
body {
  background: var(--bg);
  color: var(--text);
  font-family: var(--font);
  font-size: 14px;
  line-height: 1.5;
}

.app {
  max-width: 1280px;
  margin: 0 auto;
  padding: 24px;
}

header {
  display: flex;
  align-items: center;
  justify-content: space-between;
  margin-bottom: 20px;
  padding: 18px 24px;
  border-radius: var(--radius);
  color: #fff;
  background: linear-gradient(90deg, var(--header-from), var(--header-to));
}

header h1 { font-size: 22px; font-weight: 600; }

#clear-btn {
  background: rgba(255, 255, 255, 0.15);
  color: #fff;
  border: 1px solid rgba(255, 255, 255, 0.5);
  border-radius: 6px;
  padding: 8px 16px;
  font-size: 13px;
  cursor: pointer;
}
#clear-btn:hover { background: rgba(255, 255, 255, 0.3); }

/* KPI cards */
.kpis {
  display: grid;
  grid-template-columns: repeat(4, 1fr);
  gap: 16px;
  margin-bottom: 20px;
}
.kpi {
  background: var(--surface);
  border: 1px solid var(--border);
  border-radius: var(--radius);
  padding: 16px 20px;
}
.kpi .label {
  color: var(--text-muted);
  font-size: 12px;
  text-transform: uppercase;
  letter-spacing: 0.05em;
}
.kpi .value { font-size: 26px; font-weight: 600; }

/* Charts */
.charts {
  display: grid;
  grid-template-columns: repeat(3, 1fr);
  gap: 16px;
}
.card {
  background: var(--surface);
  border: 1px solid var(--border);
  border-radius: var(--radius);
  padding: 16px;
  min-height: 340px;
  display: flex;
  flex-direction: column;
}
.card h2 { font-size: 15px; font-weight: 600; margin-bottom: 12px; }
.plot { flex: 1; position: relative; }
.axis-title {
  color: var(--text-muted);
  font-size: 11px;
  text-align: center;
  margin-top: 6px;
}

.hbar-row {
  display: flex;
  align-items: center;
  gap: 8px;
  margin-bottom: 8px;
  cursor: pointer;
}
.hbar-row .cat {
  width: 90px;
  text-align: right;
  font-size: 12px;
  overflow: hidden;
  text-overflow: ellipsis;
  white-space: nowrap;
}
.hbar-row .track { flex: 1; position: relative; height: 22px; }

.vbars {
  display: flex;
  align-items: flex-end;
  gap: 8px;
  height: 240px;
}
.vbar-col {
  flex: 1;
  display: flex;
  flex-direction: column;
  align-items: center;
  justify-content: flex-end;
  height: 100%;
  cursor: pointer;
}
.vbar-col .cat {
  font-size: 11px;
  margin-top: 4px;
  max-width: 100%;
  overflow: hidden;
  text-overflow: ellipsis;
  white-space: nowrap;
}

.bar {
  border-radius: 3px;
  color: #fff;
  font-size: 11px;
  display: flex;
  align-items: center;
  justify-content: center;
  min-width: 2px;
  min-height: 2px;
  transition: background 0.2s;
}
.bar.neutral { color: var(--text); }

.no-data {
  position: absolute;
  inset: 0;
  display: flex;
  align-items: center;
  justify-content: center;
}

footer#status {
  margin-top: 20px;
  color: var(--text-muted);
  font-size: 13px;
  text-align: center;
}
</style>
</head>
<body>
<div class="app">
  <header>
    <h1>Sales Dashboard</h1>
    <button id="clear-btn">Clear All Filters</button>
  </header>

  <section class="kpis">
    <div class="kpi"><div class="label">Total Sales</div><div class="value" id="kpi-amount">$0</div></div>
    <div class="kpi"><div class="label">Total Profit</div><div class="value" id="kpi-profit">$0</div></div>
    <div class="kpi"><div class="label">Quantity Sold</div><div class="value" id="kpi-quantity">0</div></div>
    <div class="kpi"><div class="label">Total Orders</div><div class="value" id="kpi-orders">0</div></div>
  </section>

  <section class="charts">
    <div class="card"><h2 id="chart-subcat-title"></h2><div class="plot" id="chart-subcat"></div></div>
    <div class="card"><h2 id="chart-state-title"></h2><div class="plot" id="chart-state"></div></div>
    <div class="card"><h2 id="chart-customer-title"></h2><div class="plot" id="chart-customer"></div></div>
  </section>

  <footer id="status"></footer>
</div>

<script>
// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------
const CHART_IDS = ['chart-subcat', 'chart-state', 'chart-customer'];
let signals = emptySignals();

function emptySignals() {
  const s = {};
  CHART_IDS.forEach(id => s[id] = null);
  return s;
}

// ---------------------------------------------------------------------------
// API helpers
// ---------------------------------------------------------------------------
async function api(method, path, body) {
  const opts = { method, headers: {} };
  if (body) {
    opts.headers['Content-Type'] = 'application/json';
    opts.body = JSON.stringify(body);
  }
  const res = await fetch(path, opts);
  return res.json();
}

async function sendEvent(triggered) {
  const before = signals;
  const res = await api('POST', '/api/events', { triggered, signals });
  if (res.error) {
    console.error(res.error);
    return;
  }
  if (res.skipped) return;

  signals = res.signals || emptySignals();
  render(res.dashboard);

  // Resetting a signal is itself a change; report it so the server can skip it.
  for (const id of CHART_IDS) {
    if (before[id] !== null && signals[id] === null) {
      await api('POST', '/api/events', { triggered: [id], signals });
    }
  }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------
function render(d) {
  document.getElementById('kpi-amount').textContent = d.kpis.amount;
  document.getElementById('kpi-profit').textContent = d.kpis.profit;
  document.getElementById('kpi-quantity').textContent = d.kpis.quantity;
  document.getElementById('kpi-orders').textContent = d.kpis.orders;
  d.charts.forEach(renderChart);
  document.getElementById('status').textContent = d.status;
}

function renderChart(chart) {
  document.getElementById(chart.id + '-title').textContent = chart.title;
  const plot = document.getElementById(chart.id);
  plot.innerHTML = '';

  const fig = chart.figure;
  if (fig.kind === 'no_data') {
    const el = document.createElement('div');
    el.className = 'no-data';
    el.textContent = fig.text;
    el.style.fontSize = fig.font_size + 'px';
    el.style.color = fig.color;
    el.style.opacity = fig.opacity;
    plot.appendChild(el);
    return;
  }

  if (fig.orientation === 'horizontal') {
    renderHorizontal(plot, chart.id, fig);
  } else {
    renderVertical(plot, chart.id, fig);
  }

  const title = document.createElement('div');
  title.className = 'axis-title';
  title.textContent = fig.value_axis_title;
  plot.appendChild(title);
}

function scale(bars) {
  const max = Math.max(...bars.map(b => Math.abs(b.value)));
  return max > 0 ? max : 1;
}

function barEl(bar) {
  const el = document.createElement('div');
  el.className = 'bar' + (bar.highlighted ? '' : ' neutral');
  el.style.background = bar.color;
  el.textContent = bar.text;
  el.title = bar.label + ': ' + bar.value.toLocaleString();
  return el;
}

function renderHorizontal(plot, id, fig) {
  const max = scale(fig.bars);
  fig.bars.forEach(bar => {
    const row = document.createElement('div');
    row.className = 'hbar-row';

    const cat = document.createElement('div');
    cat.className = 'cat';
    cat.textContent = bar.label;

    const track = document.createElement('div');
    track.className = 'track';
    const el = barEl(bar);
    el.style.height = '100%';
    el.style.width = (Math.abs(bar.value) / max * 100) + '%';
    track.appendChild(el);

    row.appendChild(cat);
    row.appendChild(track);
    row.addEventListener('click', () => click(id, { x: bar.value, y: bar.label }));
    plot.appendChild(row);
  });
}

function renderVertical(plot, id, fig) {
  const max = scale(fig.bars);
  const wrap = document.createElement('div');
  wrap.className = 'vbars';
  fig.bars.forEach(bar => {
    const col = document.createElement('div');
    col.className = 'vbar-col';
    const el = barEl(bar);
    el.style.width = '100%';
    el.style.height = (Math.abs(bar.value) / max * 85) + '%';

    const cat = document.createElement('div');
    cat.className = 'cat';
    cat.textContent = bar.label;

    col.appendChild(el);
    col.appendChild(cat);
    col.addEventListener('click', () => click(id, { x: bar.label, y: bar.value }));
    wrap.appendChild(col);
  });
  plot.appendChild(wrap);
}

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------
function click(id, point) {
  signals = Object.assign({}, signals, { [id]: { points: [point] } });
  sendEvent([id]);
}

document.getElementById('clear-btn').addEventListener('click', () => sendEvent(['clear-btn']));

// Initial render: no input has fired yet.
sendEvent([]);
</script>
</body>
</html>
"##;
