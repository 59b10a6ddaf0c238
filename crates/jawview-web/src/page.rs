//! Single-page UI served at `/`

/// Toolbar with Previous/Next, status line, jump field and the pair view.
/// Navigation goes through the JSON API; the image is reloaded after each step.
pub const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Jaw Viewer</title>
<style>
  body { font-family: sans-serif; margin: 0; background: #fafafa; }
  header { display: flex; align-items: center; gap: 8px; padding: 8px 16px; background: #fff; border-bottom: 1px solid #ddd; }
  header h1 { font-size: 18px; margin: 0 16px 0 0; }
  header .spacer { flex: 1; }
  button { padding: 6px 12px; border: 1px solid #888; border-radius: 4px; background: #fff; cursor: pointer; }
  input { width: 100px; padding: 5px; }
  main { padding: 16px; }
  #view { width: 100%; max-width: 1200px; border: 1px solid #ddd; border-radius: 8px; }
  #empty { color: #666; font-size: 18px; }
</style>
</head>
<body>
<header>
  <h1>Jaw Viewer</h1>
  <button id="prev">&#x27F5; Previous</button>
  <button id="next">Next &#x27F6;</button>
  <span class="spacer"></span>
  <span id="status"></span>
  <input id="jump-index" type="number" value="0" placeholder="Go to index">
  <button id="go">Go</button>
</header>
<main>
  <img id="view" alt="pair view" hidden>
  <p id="empty" hidden>No pairs to display</p>
</main>
<script>
  const view = document.getElementById("view");
  const empty = document.getElementById("empty");
  const status = document.getElementById("status");

  function show(state) {
    status.textContent = state.label;
    const hasPair = state.pair_id !== null;
    view.hidden = !hasPair;
    empty.hidden = hasPair;
    if (hasPair) {
      view.src = "/view.png?pair=" + state.pair_id + "&t=" + Date.now();
    }
  }

  async function call(method, path, body) {
    const options = { method: method, headers: {} };
    if (body !== undefined) {
      options.headers["Content-Type"] = "application/json";
      options.body = JSON.stringify(body);
    }
    const response = await fetch(path, options);
    if (response.ok) {
      show(await response.json());
    }
  }

  document.getElementById("prev").onclick = () => call("POST", "/api/prev");
  document.getElementById("next").onclick = () => call("POST", "/api/next");
  document.getElementById("go").onclick = () =>
    call("POST", "/api/jump", { index: document.getElementById("jump-index").value });
  call("GET", "/api/state");
</script>
</body>
</html>
"#;
