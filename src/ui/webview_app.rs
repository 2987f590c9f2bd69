//! Desktop host built on `wry` + `tao`.
//!
//! Architecture:
//! - The studio window renders `STUDIO_HTML`. Its IPC messages drive a
//!   `StudioSession`; generation runs on a tokio runtime and the result comes
//!   back to the event loop as a `UserEvent`.
//! - The browser window's web view is wrapped in a `WrySurface` and mirrored
//!   by a `NavigationSync`. `BROWSER_TOOLBAR_JS` is injected into every page;
//!   it draws the navigation bar, posts commands over IPC and reports
//!   `DOMContentLoaded`.
//! - All handlers forward to the event loop through an `EventLoopProxy`, so
//!   session and navigation state live on the main thread only.

use std::error::Error;
use std::rc::{Rc, Weak};
use std::sync::Arc;

use tao::event::{Event, WindowEvent};
use tao::event_loop::{ControlFlow, EventLoop, EventLoopBuilder, EventLoopProxy};
use tao::window::{Window, WindowBuilder};
use tokio::runtime::Runtime;
use wry::{PageLoadEvent, WebView, WebViewBuilder};

use crate::app::App;
use crate::managers::navigation_sync::NavigationSync;
use crate::managers::studio_session::StudioSession;
use crate::services::image_input::parse_data_url;
use crate::services::settings_engine::SettingsEngineTrait;
use crate::types::errors::ImageInputError;
use crate::types::image::GenerationResult;
use crate::types::navigation::NavigationState;
use crate::ui::browser_surface::WrySurface;

#[derive(Debug)]
enum UserEvent {
    StudioIpc(String),
    BrowserIpc(String),
    PageLoad { started: bool, url: String },
    GenerationFinished(GenerationResult),
}

const STUDIO_HTML: &str = r#"<!DOCTYPE html><html><head><meta charset="UTF-8"><style>
body{margin:0;font-family:-apple-system,"Segoe UI",sans-serif;background:#111827;color:#e5e7eb;display:flex;height:100vh}
#panel{width:320px;padding:24px;background:#1f2937;display:flex;flex-direction:column;gap:16px}
textarea{height:120px;background:#111827;color:#e5e7eb;border:1px solid #374151;border-radius:6px;padding:8px}
button{padding:10px;border:0;border-radius:6px;background:#f59e0b;color:#111827;font-weight:600;cursor:pointer}
button:disabled{opacity:.5;cursor:not-allowed}
#out{flex:1;display:flex;align-items:center;justify-content:center;padding:32px}
#out img{max-width:100%;max-height:90vh;border-radius:8px}
.err{color:#fca5a5;border:1px solid #b91c1c;padding:12px;border-radius:6px}
</style></head><body>
<div id="panel">
<h2>Banana Studio</h2>
<textarea id="prompt" placeholder="A photorealistic robot holding a red skateboard..."></textarea>
<input id="file" type="file" accept="image/png, image/jpeg, image/webp">
<div id="pvbox" style="display:none;position:relative"><img id="preview" style="max-width:100%"><button id="unimg" title="Remove image" style="position:absolute;top:4px;right:4px;padding:2px 8px">&#215;</button></div>
<button id="gen">Generate</button>
<button id="clear">Clear All</button>
</div>
<div id="out"><p>Type a prompt and optionally upload an image, then click Generate.</p></div>
<script>
function post(cmd,args){window.ipc.postMessage(JSON.stringify(Object.assign({cmd:cmd},args||{})))}
var p=document.getElementById('prompt'),f=document.getElementById('file');
document.getElementById('gen').onclick=function(){post('generate',{prompt:p.value})};
document.getElementById('clear').onclick=function(){p.value='';f.value='';post('clear')};
document.getElementById('unimg').onclick=function(){f.value='';post('clear_image')};
f.onchange=function(){var file=f.files[0];if(!file)return;
 if(!file.type.startsWith('image/')){post('reject_image',{name:file.name});return}
 var r=new FileReader();r.onloadend=function(){post('attach_image',{data_url:r.result})};
 r.onerror=function(){post('read_failed',{name:file.name})};r.readAsDataURL(file)};
var busy=false;
window.__bs_render=function(s){
 var out=document.getElementById('out'),pv=document.getElementById('preview'),box=document.getElementById('pvbox');
 busy=s.is_loading;
 document.getElementById('gen').disabled=busy||!p.value;p.disabled=busy;
 document.getElementById('clear').disabled=busy;document.getElementById('unimg').disabled=busy;f.disabled=busy;
 if(s.input_image){pv.src='data:'+s.input_image.mimeType+';base64,'+s.input_image.data;box.style.display='block'}else{box.style.display='none';f.value=''}
 if(s.is_loading){out.innerHTML='<p>The model is thinking...</p>'}
 else if(s.error){out.innerHTML='';var d=document.createElement('div');d.className='err';d.textContent=s.error;out.appendChild(d)}
 else if(s.generated_image){out.innerHTML='';var i=document.createElement('img');i.src=s.generated_image;out.appendChild(i)}
 else{out.innerHTML='<p>Type a prompt and optionally upload an image, then click Generate.</p>'}};
p.oninput=function(){document.getElementById('gen').disabled=busy||!p.value};
post('ui_ready');
</script></body></html>"#;

const BROWSER_TOOLBAR_JS: &str = r#"
(function(){
 function post(cmd,args){window.ipc.postMessage(JSON.stringify(Object.assign({cmd:cmd},args||{})))}
 function mount(){
  if(document.getElementById('__bs_bar'))return;
  var bar=document.createElement('div');bar.id='__bs_bar';
  bar.style.cssText='position:fixed;top:0;left:0;right:0;height:40px;z-index:2147483647;display:flex;gap:6px;align-items:center;padding:0 8px;background:#1f2937;font:13px sans-serif';
  bar.innerHTML='<button id="__bs_back">&#8592;</button><button id="__bs_fwd">&#8594;</button><button id="__bs_reload">&#8635;</button><input id="__bs_addr" style="flex:1;padding:4px 8px">';
  document.documentElement.appendChild(bar);
  document.body&&(document.body.style.marginTop='40px');
  document.getElementById('__bs_back').onclick=function(){post('back')};
  document.getElementById('__bs_fwd').onclick=function(){post('forward')};
  document.getElementById('__bs_reload').onclick=function(){post('reload')};
  var a=document.getElementById('__bs_addr');a.value=location.href;
  a.onfocus=function(){a.select()};
  a.onkeydown=function(e){if(e.key==='Enter')post('navigate',{input:a.value})};
  if(window.__bs_state)window.__bs_setNavState(window.__bs_state);
 }
 window.__bs_setNavState=function(s){
  window.__bs_state=s;
  var b=document.getElementById('__bs_back');if(!b)return;
  b.disabled=!s.can_go_back;document.getElementById('__bs_fwd').disabled=!s.can_go_forward;
  document.getElementById('__bs_reload').textContent=s.is_loading?'…':'↻';
  var a=document.getElementById('__bs_addr');if(document.activeElement!==a)a.value=s.url;
 };
 document.addEventListener('DOMContentLoaded',function(){mount();post('dom_ready',{url:location.href})});
})();
"#;

/// Main-thread state owned by the event loop.
struct StudioHost {
    app: App,
    session: StudioSession,
    runtime: Runtime,
    proxy: EventLoopProxy<UserEvent>,
    studio_view: WebView,
    surface: Rc<WrySurface>,
    navigation: NavigationSync<WrySurface>,
}

impl StudioHost {
    fn render_studio(&self) {
        let json = serde_json::to_string(&self.session).unwrap_or_default();
        if let Err(err) = self.studio_view.evaluate_script(&format!("window.__bs_render&&__bs_render({})", json)) {
            tracing::warn!(error = %err, "failed to render studio");
        }
    }

    fn handle_studio_ipc(&mut self, message: &str) {
        let Ok(msg) = serde_json::from_str::<serde_json::Value>(message) else {
            tracing::warn!("malformed studio IPC message");
            return;
        };
        let cmd = msg.get("cmd").and_then(|v| v.as_str()).unwrap_or("");

        match cmd {
            "ui_ready" => {}
            "generate" => {
                let prompt = msg.get("prompt").and_then(|v| v.as_str()).unwrap_or("");
                self.session.set_prompt(prompt);
                if let Ok(request) = self.session.begin_generation() {
                    let generator = Arc::clone(&self.app.generator);
                    let proxy = self.proxy.clone();
                    self.runtime.spawn(async move {
                        let result = generator.generate(request.prompt(), request.image().cloned()).await;
                        let _ = proxy.send_event(UserEvent::GenerationFinished(result));
                    });
                }
            }
            "attach_image" => {
                let data_url = msg.get("data_url").and_then(|v| v.as_str()).unwrap_or("");
                match parse_data_url(data_url) {
                    Ok(image) => self.session.attach_image(image),
                    Err(err) => self.session.reject_image(&err),
                }
            }
            "reject_image" => {
                let name = msg.get("name").and_then(|v| v.as_str()).unwrap_or("");
                let err = ImageInputError::UnsupportedType(name.to_string());
                self.session.reject_image(&err);
            }
            "read_failed" => {
                let err = ImageInputError::ReadFailed(std::io::Error::other("file reader error"));
                self.session.reject_image(&err);
            }
            "clear_image" => self.session.clear_input_image(),
            "clear" => self.session.clear(),
            other => {
                tracing::debug!(cmd = other, "ignored studio IPC command");
                return;
            }
        }
        self.render_studio();
    }

    fn handle_browser_ipc(&mut self, message: &str) {
        let Ok(msg) = serde_json::from_str::<serde_json::Value>(message) else {
            return;
        };
        match msg.get("cmd").and_then(|v| v.as_str()).unwrap_or("") {
            "back" => self.navigation.back(),
            "forward" => self.navigation.forward(),
            "reload" => self.navigation.reload(),
            "navigate" => {
                let input = msg.get("input").and_then(|v| v.as_str()).unwrap_or("");
                self.navigation.submit_address(input);
            }
            "dom_ready" => self.surface.on_dom_ready(),
            _ => {}
        }
    }
}

/// Push each published navigation state into the injected toolbar.
fn toolbar_watcher(surface: Weak<WrySurface>) -> impl Fn(&NavigationState) + 'static {
    move |state| {
        let Some(surface) = surface.upgrade() else {
            return;
        };
        let json = serde_json::to_string(state).unwrap_or_default();
        let _ = surface
            .webview()
            .evaluate_script(&format!("window.__bs_setNavState&&__bs_setNavState({})", json));
    }
}

fn build_in_window(builder: WebViewBuilder<'_>, window: &Window) -> Result<WebView, Box<dyn Error>> {
    #[cfg(target_os = "linux")]
    {
        use tao::platform::unix::WindowExtUnix;
        use wry::WebViewBuilderExtUnix;
        let vbox = window.default_vbox().ok_or("window has no GTK container")?;
        Ok(builder.build_gtk(vbox)?)
    }

    #[cfg(not(target_os = "linux"))]
    {
        Ok(builder.build(window)?)
    }
}

// ─── Main entry point ───

pub fn run(app: App) -> Result<(), Box<dyn Error>> {
    let home_url = app.settings_engine.get_settings().home_url.clone();
    let runtime = Runtime::new()?;

    let event_loop: EventLoop<UserEvent> = EventLoopBuilder::with_user_event().build();
    let proxy = event_loop.create_proxy();

    let studio_window = WindowBuilder::new()
        .with_title("Banana Studio")
        .with_inner_size(tao::dpi::LogicalSize::new(1200.0, 800.0))
        .build(&event_loop)?;
    let browser_window = WindowBuilder::new()
        .with_title("Banana Studio Browser")
        .with_inner_size(tao::dpi::LogicalSize::new(1100.0, 760.0))
        .build(&event_loop)?;

    let studio_proxy = proxy.clone();
    let studio_view = build_in_window(
        WebViewBuilder::new()
            .with_html(STUDIO_HTML)
            .with_ipc_handler(move |msg: wry::http::Request<String>| {
                let _ = studio_proxy.send_event(UserEvent::StudioIpc(msg.body().clone()));
            })
            .with_devtools(cfg!(debug_assertions)),
        &studio_window,
    )?;

    let browser_proxy = proxy.clone();
    let load_proxy = proxy.clone();
    let browser_view = build_in_window(
        WebViewBuilder::new()
            .with_initialization_script(BROWSER_TOOLBAR_JS)
            .with_url(&home_url)
            .with_ipc_handler(move |msg: wry::http::Request<String>| {
                let _ = browser_proxy.send_event(UserEvent::BrowserIpc(msg.body().clone()));
            })
            .with_on_page_load_handler(move |event, url| {
                let started = matches!(event, PageLoadEvent::Started);
                let _ = load_proxy.send_event(UserEvent::PageLoad { started, url });
            })
            .with_devtools(cfg!(debug_assertions)),
        &browser_window,
    )?;

    let surface = Rc::new(WrySurface::new(browser_view));
    let mut navigation = NavigationSync::new(&home_url);
    navigation.watch(toolbar_watcher(Rc::downgrade(&surface)));
    navigation.attach(Rc::clone(&surface));

    let mut host = StudioHost {
        app,
        session: StudioSession::new(),
        runtime,
        proxy,
        studio_view,
        surface,
        navigation,
    };
    tracing::info!(home = %home_url, "studio windows ready");

    event_loop.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::Wait;

        match event {
            Event::WindowEvent {
                event: WindowEvent::CloseRequested,
                window_id,
                ..
            } => {
                tracing::info!(?window_id, "window closed, exiting");
                host.navigation.detach();
                *control_flow = ControlFlow::Exit;
            }

            Event::UserEvent(user_event) => match user_event {
                UserEvent::StudioIpc(body) => host.handle_studio_ipc(&body),
                UserEvent::BrowserIpc(body) => host.handle_browser_ipc(&body),
                UserEvent::PageLoad { started, url } => {
                    tracing::debug!(started, %url, "page load");
                    host.surface.on_page_load(started, &url);
                }
                UserEvent::GenerationFinished(result) => {
                    if host.session.finish_generation(result) {
                        host.render_studio();
                    }
                }
            },

            _ => {}
        }

        // Windows must outlive their web views.
        let _ = (&studio_window, &browser_window);
    });
}
