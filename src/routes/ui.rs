use axum::{response::Html, routing::get, Router};

use crate::models::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(index))
}

async fn index() -> Html<&'static str> {
    Html(r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1" />
  <title>Chat with Documents</title>
  <style>
    body { font-family: Arial, sans-serif; margin: 0; color: #1d1d1f; display: flex; height: 100vh; }
    aside { width: 280px; padding: 1rem; border-right: 1px solid #ddd; background: #f7f7f9; }
    main { flex: 1; display: flex; flex-direction: column; padding: 1rem 2rem; }
    #messages { flex: 1; overflow-y: auto; }
    .bubble { border-radius: 8px; padding: 0.6rem 0.9rem; margin: 0.5rem 0; }
    .user { background: #e8f0fe; }
    .assistant { background: #f1f3f4; }
    .role { font-size: 0.75rem; font-weight: 600; text-transform: uppercase; color: #666; }
    .notice { margin-top: 0.75rem; padding: 0.5rem; border-radius: 6px; }
    .success { background: #e6f4ea; }
    .error { background: #fce8e6; }
    form { display: flex; gap: 0.5rem; padding-top: 0.5rem; }
    input[type=text] { flex: 1; padding: 0.6rem; }
    button { padding: 0.6rem 1rem; margin-top: 0.5rem; }
    ul { padding-left: 1.2rem; }
    .content p { margin: 0.3rem 0; }
    .content table { border-collapse: collapse; margin: 0.4rem 0; }
    .content th, .content td { border: 1px solid #ccc; padding: 0.2rem 0.5rem; }
    .content pre { background: #fff; padding: 0.5rem; overflow-x: auto; }
  </style>
</head>
<body>
  <aside>
    <h2>Upload Documents</h2>
    <input id="fileInput" type="file" multiple accept=".pdf,.docx,.txt,.xlsx" />
    <button id="uploadBtn">Upload</button>
    <div id="uploadStatus"></div>
    <h3>Documents</h3>
    <ul id="documents"></ul>
    <button id="clearBtn">Clear Chat</button>
  </aside>
  <main>
    <h1>Chat with Your Documents</h1>
    <div id="messages"></div>
    <div id="chatError"></div>
    <form id="chatForm">
      <input id="chatInput" type="text" placeholder="Ask something about your documents or anything else..." />
      <button type="submit">Send</button>
    </form>
  </main>

  <script>
    let sessionId = sessionStorage.getItem('sessionId');

    async function ensureSession() {
      if (sessionId) {
        const res = await fetch(`/api/sessions/${sessionId}`);
        if (res.ok) { return render(await res.json()); }
      }
      const res = await fetch('/api/sessions', { method: 'POST' });
      sessionId = (await res.json()).session_id;
      sessionStorage.setItem('sessionId', sessionId);
      await refresh();
    }

    async function refresh() {
      const res = await fetch(`/api/sessions/${sessionId}`);
      render(await res.json());
    }

    function notice(el, text, kind) {
      el.innerHTML = '';
      if (!text) return;
      const div = document.createElement('div');
      div.className = `notice ${kind}`;
      div.textContent = text;
      el.appendChild(div);
    }

    function escapeHtml(text) {
      return text.replace(/&/g, '&amp;').replace(/</g, '&lt;').replace(/>/g, '&gt;')
        .replace(/"/g, '&quot;').replace(/'/g, '&#39;');
    }

    function inline(text) {
      return text
        .replace(/`([^`]+)`/g, '<code>$1</code>')
        .replace(/\*\*([^*]+)\*\*/g, '<strong>$1</strong>')
        .replace(/\*([^*]+)\*/g, '<em>$1</em>');
    }

    function tableCells(line) {
      return line.trim().replace(/^\|/, '').replace(/\|$/, '')
        .split(/(?<!\\)\|/).map(cell => inline(cell.trim().replace(/\\\|/g, '|')));
    }

    // Message text is escaped first, so only the markup produced here reaches the DOM.
    function renderMarkdown(source) {
      const lines = escapeHtml(source).split('\n');
      const out = [];
      let i = 0;
      while (i < lines.length) {
        const line = lines[i];
        if (line.startsWith('```')) {
          const code = [];
          i++;
          while (i < lines.length && !lines[i].startsWith('```')) { code.push(lines[i++]); }
          i++;
          out.push(`<pre><code>${code.join('\n')}</code></pre>`);
        } else if (line.trim().startsWith('|') && i + 1 < lines.length && /^\s*\|?\s*:?-{3,}/.test(lines[i + 1])) {
          const header = tableCells(line).map(c => `<th>${c}</th>`).join('');
          i += 2;
          const rows = [];
          while (i < lines.length && lines[i].trim().startsWith('|')) {
            rows.push(`<tr>${tableCells(lines[i++]).map(c => `<td>${c}</td>`).join('')}</tr>`);
          }
          out.push(`<table><thead><tr>${header}</tr></thead><tbody>${rows.join('')}</tbody></table>`);
        } else if (/^#{1,6} /.test(line)) {
          const level = line.indexOf(' ');
          out.push(`<h${level}>${inline(line.slice(level + 1))}</h${level}>`);
          i++;
        } else if (/^\s*([-*]|\d+\.) /.test(line)) {
          const ordered = /^\s*\d+\./.test(line);
          const items = [];
          while (i < lines.length && /^\s*([-*]|\d+\.) /.test(lines[i])) {
            items.push(`<li>${inline(lines[i++].replace(/^\s*([-*]|\d+\.) /, ''))}</li>`);
          }
          const tag = ordered ? 'ol' : 'ul';
          out.push(`<${tag}>${items.join('')}</${tag}>`);
        } else if (line.trim() === '') {
          i++;
        } else {
          const para = [inline(lines[i++])];
          while (i < lines.length && lines[i].trim() !== '' && !/^(```|#{1,6} |\s*\||\s*([-*]|\d+\.) )/.test(lines[i])) {
            para.push(inline(lines[i++]));
          }
          out.push(`<p>${para.join('<br>')}</p>`);
        }
      }
      return out.join('');
    }

    function render(view) {
      const messages = document.getElementById('messages');
      messages.innerHTML = '';
      for (const msg of view.messages) {
        const div = document.createElement('div');
        div.className = `bubble ${msg.role}`;
        const role = document.createElement('div');
        role.className = 'role';
        role.textContent = msg.role;
        const content = document.createElement('div');
        content.className = 'content';
        content.innerHTML = renderMarkdown(msg.content);
        div.append(role, content);
        messages.appendChild(div);
      }
      messages.scrollTop = messages.scrollHeight;

      const docs = document.getElementById('documents');
      docs.innerHTML = '';
      for (const doc of view.documents) {
        const li = document.createElement('li');
        li.textContent = `${doc.file_name} (${doc.characters} chars)`;
        docs.appendChild(li);
      }
    }

    document.getElementById('uploadBtn').addEventListener('click', async () => {
      const input = document.getElementById('fileInput');
      const status = document.getElementById('uploadStatus');
      if (!input.files.length) { return notice(status, 'Select files first.', 'error'); }
      const formData = new FormData();
      for (const file of input.files) { formData.append('files', file); }
      notice(status, 'Processing files...', 'success');
      const res = await fetch(`/api/sessions/${sessionId}/files`, { method: 'POST', body: formData });
      const report = await res.json();
      if (!res.ok) { return notice(status, report.error ? report.error.message : 'Upload failed', 'error'); }
      const failed = report.files.filter(f => f.status === 'failed');
      const detail = failed.map(f => `${f.file_name}: ${f.error}`).join('\n');
      notice(status, detail ? `${report.notice}\n${detail}` : report.notice, failed.length ? 'error' : 'success');
      await refresh();
    });

    document.getElementById('clearBtn').addEventListener('click', async () => {
      const res = await fetch(`/api/sessions/${sessionId}/messages`, { method: 'DELETE' });
      notice(document.getElementById('chatError'), '', '');
      render(await res.json());
    });

    document.getElementById('chatForm').addEventListener('submit', async (event) => {
      event.preventDefault();
      const input = document.getElementById('chatInput');
      const message = input.value.trim();
      if (!message) return;
      input.value = '';
      const errorBox = document.getElementById('chatError');
      notice(errorBox, 'Thinking...', 'success');
      const res = await fetch(`/api/sessions/${sessionId}/chat`, {
        method: 'POST',
        headers: { 'Content-Type': 'application/json' },
        body: JSON.stringify({ message })
      });
      const body = await res.json();
      notice(errorBox, res.ok ? '' : `Error: ${body.error.message}`, 'error');
      await refresh();
    });

    ensureSession();
  </script>
</body>
</html>"#)
}
