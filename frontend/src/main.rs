use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::components::{Route, Router, Routes, A};
use leptos_router::path;
use lucide_leptos::{
    ArrowUpDown, ChartColumn, ChevronDown, ChevronRight, FlaskConical, Pencil, TriangleAlert, X,
};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsValue;

use nerfdash_core::format::{format_date, format_metric};
use nerfdash_core::models::{
    CategoryKey, ExperimentRecord, Field, FieldValue, MediaKind, MetricKey, TableRecord,
};
use nerfdash_core::view::PER_PAGE_CHOICES;
use nerfdash_core::{
    group_records, normalize, pivot, replace_record, ExperimentSet, MetricChart, PivotOptions,
    PrimaryFilter, ViewState,
};

const EXPERIMENT_URL: &str = "/api/experiments";

// ─── API calls ───────────────────────────────────────────────────────────────

async fn fetch_experiments() -> Result<Vec<ExperimentRecord>, String> {
    let resp = gloo_net::http::Request::get(EXPERIMENT_URL)
        .send()
        .await
        .map_err(|e| e.to_string())?;

    if !resp.ok() {
        return Err(format!("Error fetching experiments: {}", resp.status()));
    }

    let text = resp.text().await.map_err(|e| e.to_string())?;
    let set: ExperimentSet = serde_json::from_str(&text).map_err(|e| e.to_string())?;
    Ok(set.items)
}

async fn put_experiment(record: ExperimentRecord) -> Result<(), String> {
    let resp = gloo_net::http::Request::put(&format!("{}/{}", EXPERIMENT_URL, record.id))
        .json(&record)
        .map_err(|e| e.to_string())?
        .send()
        .await
        .map_err(|e| e.to_string())?;

    if !resp.ok() {
        return Err(format!("Error saving experiment: {}", resp.status()));
    }
    Ok(())
}

// ─── Shared state ────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
enum LoadState {
    Loading,
    Ready,
    Failed(String),
}

#[derive(Clone, Debug, PartialEq)]
struct Notice {
    ok: bool,
    text: String,
}

#[derive(Clone, Copy)]
struct DataContext {
    records: RwSignal<Vec<ExperimentRecord>>,
    load: RwSignal<LoadState>,
    notice: RwSignal<Option<Notice>>,
}

// ─── App shell ───────────────────────────────────────────────────────────────

#[component]
fn App() -> impl IntoView {
    let records = RwSignal::new(Vec::<ExperimentRecord>::new());
    let load = RwSignal::new(LoadState::Loading);
    let notice = RwSignal::new(Option::<Notice>::None);
    provide_context(DataContext {
        records,
        load,
        notice,
    });

    // One fetch per page load; the last resolved response wins.
    spawn_local(async move {
        match fetch_experiments().await {
            Ok(items) => {
                records.set(items);
                load.set(LoadState::Ready);
            }
            Err(e) => load.set(LoadState::Failed(e)),
        }
    });

    view! {
        <Router>
            <div class="flex h-screen bg-slate-950 text-slate-100 font-sans">
                <nav class="w-60 border-r border-slate-800 flex flex-col p-4 bg-slate-900/50">
                    <div class="flex items-center space-x-3 px-2 py-6 mb-6">
                        <div class="p-2 bg-blue-600 rounded-lg shadow-lg shadow-blue-900/20">
                            <FlaskConical size=24 />
                        </div>
                        <span class="text-2xl font-bold tracking-tight text-white">"nerfdash"</span>
                    </div>

                    <div class="space-y-1">
                        <A href="/" attr:class="flex items-center space-x-3 px-4 py-3 rounded-xl hover:bg-slate-800 transition-all duration-200 text-slate-400 hover:text-white group">
                            <div class="group-hover:text-blue-400 transition-colors">
                                <FlaskConical size=20 />
                            </div>
                            <span class="font-medium">"Experiments"</span>
                        </A>
                        <A href="/metrics" attr:class="flex items-center space-x-3 px-4 py-3 rounded-xl hover:bg-slate-800 transition-all duration-200 text-slate-400 hover:text-white group">
                            <div class="group-hover:text-blue-400 transition-colors">
                                <ChartColumn size=20 />
                            </div>
                            <span class="font-medium">"Category metrics"</span>
                        </A>
                    </div>
                </nav>

                <main class="flex-grow overflow-auto p-8">
                    <Routes fallback=|| view! { <NotFound /> }.into_any()>
                        <Route path=path!("/") view=|| view! { <RecordsPage /> } />
                        <Route path=path!("/metrics") view=|| view! { <MetricsPage /> } />
                    </Routes>
                </main>

                <NoticeToast />
            </div>
        </Router>
    }
    .into_any()
}

#[component]
fn NotFound() -> impl IntoView {
    view! {
        <div class="h-full flex flex-col items-center justify-center space-y-4 text-center">
            <TriangleAlert size=48 />
            <p class="text-slate-400">"Page not found"</p>
            <A href="/" attr:class="text-blue-400 hover:underline">"Back to the experiments"</A>
        </div>
    }
    .into_any()
}

/// Transient save notification, bottom-right.
#[component]
fn NoticeToast() -> impl IntoView {
    let ctx = use_context::<DataContext>().expect("DataContext not found");
    view! {
        {move || ctx.notice.get().map(|notice| {
            let tone = if notice.ok {
                "bg-emerald-600/20 border-emerald-500/40 text-emerald-300"
            } else {
                "bg-red-600/20 border-red-500/40 text-red-300"
            };
            view! {
                <div class=format!("fixed bottom-6 right-6 z-50 flex items-center space-x-3 px-4 py-3 rounded-xl border shadow-2xl backdrop-blur {tone}")>
                    <span class="text-sm">{notice.text}</span>
                    <button
                        class="opacity-60 hover:opacity-100 transition-opacity"
                        on:click=move |_| ctx.notice.set(None)
                    >
                        <X size=14 />
                    </button>
                </div>
            }
        })}
    }
}

// ─── Records page ────────────────────────────────────────────────────────────

#[component]
fn RecordsPage() -> impl IntoView {
    let ctx = use_context::<DataContext>().expect("DataContext not found");
    let view_state = RwSignal::new(ViewState::default());
    let editing = RwSignal::new(Option::<ExperimentRecord>::None);

    // Derived table set: re-normalized and re-sorted on every input change.
    let table = Memo::new(move |_| {
        let mut rows = normalize(&ctx.records.get());
        view_state.with(|v| v.sort.apply(&mut rows));
        rows
    });

    view! {
        {move || match ctx.load.get() {
            LoadState::Loading => view! {
                <div class="p-12 text-center text-slate-500">"Loading experiments..."</div>
            }
            .into_any(),
            LoadState::Failed(e) => view! {
                <div class="h-full flex flex-col items-center justify-center space-y-4 text-center">
                    <TriangleAlert size=48 />
                    <h2 class="text-xl font-bold text-white">"Could not load experiments"</h2>
                    <p class="text-red-400 text-sm font-mono">{e}</p>
                </div>
            }
            .into_any(),
            LoadState::Ready if ctx.records.with(|r| r.is_empty()) => view! {
                <div class="p-12 text-center text-slate-500">"No data"</div>
            }
            .into_any(),
            LoadState::Ready => view! {
                <div class="space-y-6">
                    <h1 class="text-3xl font-bold text-white">"Experiments"</h1>
                    <ControlPanel view_state=view_state />
                    <ColumnSelector view_state=view_state />
                    <div class="bg-slate-900 border border-slate-800 rounded-2xl p-4">
                        {move || if view_state.with(|v| v.group_by.is_some()) {
                            view! { <GroupedView table=table view_state=view_state /> }.into_any()
                        } else {
                            view! {
                                <DataTable table=table view_state=view_state editing=editing />
                                <TablePagination view_state=view_state total=Signal::derive(move || table.with(|t| t.len())) />
                            }
                            .into_any()
                        }}
                    </div>
                    <EditModal editing=editing />
                </div>
            }
            .into_any(),
        }}
    }
}

/// Group-by select plus the aggregation metric picks.
#[component]
fn ControlPanel(view_state: RwSignal<ViewState>) -> impl IntoView {
    view! {
        <div class="bg-slate-900 border border-slate-800 rounded-2xl p-4 space-y-4">
            <div class="flex items-center space-x-3">
                <label class="text-xs font-semibold text-slate-500 uppercase">"Group by"</label>
                <select
                    class="bg-slate-950 border border-slate-800 rounded-lg px-3 py-2 text-sm text-white focus:border-blue-500 outline-none"
                    on:change=move |ev| {
                        let value = event_target_value(&ev);
                        view_state.update(|v| {
                            v.set_group_by(if value.is_empty() { None } else { Some(value.as_str()) })
                        });
                    }
                >
                    <option value="">"None"</option>
                    {Field::all().map(|field| view! {
                        <option value=field.as_str()>{field.label()}</option>
                    }).collect_view()}
                </select>
            </div>

            <div>
                <p class="text-xs font-semibold text-slate-500 uppercase mb-2">"Aggregations"</p>
                <div class="flex flex-wrap gap-2">
                    {MetricKey::ALL.into_iter().map(|metric| {
                        let active = move || view_state.with(|v| v.is_aggregated(metric));
                        view! {
                            <button
                                on:click=move |_| view_state.update(|v| {
                                    if v.is_aggregated(metric) {
                                        v.aggregations.retain(|m| *m != metric);
                                    } else {
                                        v.aggregations.push(metric);
                                        v.aggregations.sort();
                                    }
                                })
                                class=move || format!(
                                    "px-2 py-1 rounded-md text-xs border transition-colors {}",
                                    if active() {
                                        "bg-blue-600/10 border-blue-500/50 text-blue-300"
                                    } else {
                                        "border-slate-700 text-slate-500 hover:text-slate-300"
                                    }
                                )
                            >
                                {metric.label()}
                            </button>
                        }
                    }).collect_view()}
                </div>
            </div>
        </div>
    }
}

#[component]
fn ColumnSelector(view_state: RwSignal<ViewState>) -> impl IntoView {
    view! {
        <div class="bg-slate-900 border border-slate-800 rounded-2xl p-4">
            <p class="text-xs font-semibold text-slate-500 uppercase mb-2">"Columns"</p>
            <div class="flex flex-wrap gap-2">
                {Field::all().map(|field| {
                    let active = move || view_state.with(|v| v.is_visible(field));
                    view! {
                        <button
                            on:click=move |_| view_state.update(|v| {
                                if v.is_visible(field) {
                                    v.visible_columns.retain(|f| *f != field);
                                } else {
                                    let selected: Vec<&str> = Field::all()
                                        .filter(|f| v.is_visible(*f) || *f == field)
                                        .map(|f| f.as_str())
                                        .collect();
                                    v.set_visible_columns(selected);
                                }
                            })
                            class=move || format!(
                                "px-2 py-1 rounded-md text-xs border transition-colors {}",
                                if active() {
                                    "bg-slate-800 border-slate-600 text-slate-200"
                                } else {
                                    "border-slate-800 text-slate-600 hover:text-slate-400"
                                }
                            )
                        >
                            {field.label()}
                        </button>
                    }
                }).collect_view()}
            </div>
        </div>
    }
}

/// One rendered cell of the records table.
fn cell_view(record: &TableRecord, field: Field) -> AnyView {
    match record.value_of(field) {
        FieldValue::Tags(tags) => view! {
            <div class="flex flex-wrap gap-1">
                {tags.iter().map(|tag| view! {
                    <span class="px-2 py-0.5 bg-slate-800 text-slate-400 rounded text-[10px]">
                        {tag.label()}
                    </span>
                }).collect_view()}
            </div>
        }
        .into_any(),
        value => view! { <span>{cell_text(field, value)}</span> }.into_any(),
    }
}

fn cell_text(field: Field, value: FieldValue<'_>) -> String {
    match value {
        FieldValue::Int(v) => v.to_string(),
        FieldValue::Text(v) => v.to_string(),
        FieldValue::Bool(v) => if v { "Yes" } else { "No" }.to_string(),
        FieldValue::Time(v) => format_date(&v),
        FieldValue::Num(v) => match (field, v) {
            (_, None) => "-".to_string(),
            (Field::Metric(m), Some(n)) => format_metric(m, n),
            (_, Some(n)) => format!("{n:.2}"),
        },
        FieldValue::Tags(_) => String::new(),
    }
}

#[component]
fn DataTable(
    table: Memo<Vec<TableRecord>>,
    view_state: RwSignal<ViewState>,
    editing: RwSignal<Option<ExperimentRecord>>,
) -> impl IntoView {
    let ctx = use_context::<DataContext>().expect("DataContext not found");

    view! {
        <div class="overflow-x-auto">
            <table class="w-full text-left border-collapse min-w-max">
                <thead class="bg-slate-950 text-xs uppercase text-slate-500 font-semibold sticky top-0">
                    <tr>
                        {move || view_state.with(|v| v.visible_columns.clone()).into_iter().map(|field| {
                            let is_sorted = move || view_state.with(|v| v.sort.column == Some(field));
                            view! {
                                <th class="p-3 border-b border-slate-800">
                                    <button
                                        class="flex items-center space-x-1 hover:text-slate-300 transition-colors"
                                        on:click=move |_| view_state.update(|v| v.toggle_sort(field))
                                    >
                                        <span>{field.label()}</span>
                                        {move || is_sorted().then(|| view! { <ArrowUpDown size=12 /> })}
                                    </button>
                                </th>
                            }
                        }).collect_view()}
                        <th class="p-3 border-b border-slate-800"></th>
                    </tr>
                </thead>
                <tbody class="divide-y divide-slate-800/50 text-sm text-slate-300">
                    {move || {
                        let v = view_state.get();
                        let rows = table.get();
                        let (start, end) = v.page_bounds(rows.len());
                        rows[start..end].to_vec().into_iter().map(|record| {
                            let id = record.id;
                            view! {
                                <tr class="hover:bg-slate-800/30 transition-colors group">
                                    {v.visible_columns.iter().map(|&field| view! {
                                        <td class="p-3">{cell_view(&record, field)}</td>
                                    }).collect_view()}
                                    <td class="p-3">
                                        <button
                                            class="p-1 text-slate-600 hover:text-blue-400 opacity-0 group-hover:opacity-100 transition-opacity"
                                            title="Edit experiment"
                                            on:click=move |_| {
                                                let raw = ctx.records.with(|rs| rs.iter().find(|r| r.id == id).cloned());
                                                editing.set(raw);
                                            }
                                        >
                                            <Pencil size=14 />
                                        </button>
                                    </td>
                                </tr>
                            }
                        }).collect_view()
                    }}
                </tbody>
            </table>
        </div>
    }
}

#[component]
fn TablePagination(view_state: RwSignal<ViewState>, total: Signal<usize>) -> impl IntoView {
    view! {
        <div class="flex items-center justify-between pt-4 text-sm text-slate-400">
            <div class="flex items-center space-x-2">
                <span>"Rows per page:"</span>
                <select
                    class="bg-slate-950 border border-slate-800 rounded-lg px-2 py-1 text-white outline-none"
                    on:change=move |ev| {
                        if let Ok(n) = event_target_value(&ev).parse::<usize>() {
                            view_state.update(|v| v.set_per_page(n));
                        }
                    }
                >
                    {PER_PAGE_CHOICES.into_iter().map(|n| view! {
                        <option value=n.to_string() selected=move || view_state.with(|v| v.per_page == n)>
                            {n.to_string()}
                        </option>
                    }).collect_view()}
                </select>
                {move || {
                    let v = view_state.get();
                    let (start, end) = v.page_bounds(total.get());
                    format!("Showing {} to {} of {} entries", (start + 1).min(end.max(1)), end, total.get())
                }}
            </div>
            <div class="flex items-center space-x-2">
                <button
                    class="px-3 py-1 rounded-lg border border-slate-800 hover:bg-slate-800 disabled:opacity-40 transition-colors"
                    disabled=move || view_state.with(|v| v.page <= 1)
                    on:click=move |_| view_state.update(|v| v.page = v.page.saturating_sub(1).max(1))
                >
                    "Previous"
                </button>
                {move || {
                    let v = view_state.get();
                    format!("Page {} of {}", v.page, v.page_count(total.get()))
                }}
                <button
                    class="px-3 py-1 rounded-lg border border-slate-800 hover:bg-slate-800 disabled:opacity-40 transition-colors"
                    disabled=move || view_state.with(|v| v.page >= v.page_count(total.get()))
                    on:click=move |_| {
                        let pages = view_state.with(|v| v.page_count(total.get()));
                        view_state.update(|v| v.page = (v.page + 1).min(pages));
                    }
                >
                    "Next"
                </button>
            </div>
        </div>
    }
}

// ─── Grouped view ────────────────────────────────────────────────────────────

#[component]
fn GroupedView(table: Memo<Vec<TableRecord>>, view_state: RwSignal<ViewState>) -> impl IntoView {
    let expanded = RwSignal::new(Vec::<String>::new());

    let groups = Memo::new(move |_| {
        let v = view_state.get();
        match v.group_by {
            Some(field) => group_records(&table.get(), field, &v.aggregations),
            None => Vec::new(),
        }
    });

    // Every visible column except the grouped one; aggregate cells appear
    // under the columns that are aggregated metrics.
    let columns = Memo::new(move |_| {
        let v = view_state.get();
        v.visible_columns
            .iter()
            .copied()
            .filter(|f| Some(*f) != v.group_by)
            .collect::<Vec<Field>>()
    });

    view! {
        <div class="overflow-x-auto">
            <table class="w-full text-left border-collapse min-w-max">
                <thead class="bg-slate-950 text-xs uppercase text-slate-500 font-semibold">
                    <tr>
                        <th class="p-3 border-b border-slate-800 w-[220px]">
                            {move || view_state.with(|v| v.group_by.map(|f| f.label()).unwrap_or(""))}
                        </th>
                        {move || columns.get().into_iter().map(|field| {
                            let is_sorted = move || view_state.with(|v| v.sort.column == Some(field));
                            view! {
                                <th class="p-3 border-b border-slate-800 text-center">
                                    <button
                                        class="flex items-center space-x-1 mx-auto hover:text-slate-300 transition-colors"
                                        on:click=move |_| view_state.update(|v| v.toggle_sort(field))
                                    >
                                        <span>{field.label()}</span>
                                        {move || is_sorted().then(|| view! { <ArrowUpDown size=12 /> })}
                                    </button>
                                </th>
                            }
                        }).collect_view()}
                    </tr>
                </thead>
                <tbody class="divide-y divide-slate-800/50 text-sm text-slate-300">
                    {move || groups.get().into_iter().map(|group| {
                        let key = group.key.clone();
                        let key_toggle = key.clone();
                        let is_open = {
                            let key = key.clone();
                            move || expanded.with(|e| e.contains(&key))
                        };
                        let columns = columns.get();
                        let member_columns = columns.clone();
                        let aggregated = view_state.with(|v| v.aggregations.clone());
                        let mut members = group.members.clone();
                        view_state.with(|v| v.sort.apply(&mut members));

                        view! {
                            <tr class="font-medium hover:bg-slate-800/30 transition-colors">
                                <td class="p-3">
                                    <div class="flex items-center space-x-2">
                                        <button
                                            class="p-0.5 text-slate-500 hover:text-white transition-colors"
                                            on:click=move |_| expanded.update(|e| {
                                                if let Some(pos) = e.iter().position(|k| *k == key_toggle) {
                                                    e.remove(pos);
                                                } else {
                                                    e.push(key_toggle.clone());
                                                }
                                            })
                                        >
                                            {
                                                let is_open = is_open.clone();
                                                move || if is_open() {
                                                    view! { <ChevronDown size=14 /> }.into_any()
                                                } else {
                                                    view! { <ChevronRight size=14 /> }.into_any()
                                                }
                                            }
                                        </button>
                                        <span class="text-white">{group.key.clone()}</span>
                                        <span class="px-2 py-0.5 bg-slate-800 text-slate-400 rounded text-[10px]">
                                            {group.members.len()}
                                        </span>
                                    </div>
                                </td>
                                {columns.iter().map(|&field| {
                                    match field {
                                        Field::Metric(metric) if aggregated.contains(&metric) => {
                                            let stats = &group.stats[&metric];
                                            let text = if stats.is_empty() {
                                                "-".to_string()
                                            } else {
                                                format_metric(metric, stats.avg)
                                            };
                                            let range = format!(
                                                "Min: {}, Max: {}",
                                                format_metric(metric, stats.min),
                                                format_metric(metric, stats.max),
                                            );
                                            view! {
                                                <td class="p-3 text-center" title=range>{text}</td>
                                            }
                                            .into_any()
                                        }
                                        _ => view! { <td class="p-3 text-center"></td> }.into_any(),
                                    }
                                }).collect_view()}
                            </tr>
                            {
                                let is_open = is_open.clone();
                                move || is_open().then(|| members.clone().into_iter().map(|member| view! {
                                    <tr class="hover:bg-slate-800/20 text-slate-400">
                                        <td class="p-3 pl-10">"-"</td>
                                        {member_columns.iter().map(|&field| view! {
                                            <td class="p-3 text-center">{cell_view(&member, field)}</td>
                                        }).collect_view()}
                                    </tr>
                                }).collect_view())
                            }
                        }
                    }).collect_view()}
                </tbody>
            </table>
        </div>
    }
}

// ─── Edit modal ──────────────────────────────────────────────────────────────

#[component]
fn EditModal(editing: RwSignal<Option<ExperimentRecord>>) -> impl IntoView {
    let ctx = use_context::<DataContext>().expect("DataContext not found");

    view! {
        {move || editing.get().map(|record| {
            let draft = RwSignal::new(record);

            let save = move |_| {
                let updated = draft.get();
                let title = updated.title.clone();

                // The edit is applied locally whatever the server says;
                // only the notification reflects the PUT outcome.
                ctx.records.update(|records| {
                    let _ = replace_record(records, updated.clone());
                });
                editing.set(None);

                spawn_local(async move {
                    match put_experiment(updated).await {
                        Ok(()) => ctx.notice.set(Some(Notice {
                            ok: true,
                            text: format!("Experiment \"{title}\" updated"),
                        })),
                        Err(e) => ctx.notice.set(Some(Notice {
                            ok: false,
                            text: format!("Saving \"{title}\" failed: {e}"),
                        })),
                    }
                });
            };

            view! {
                <div class="fixed inset-0 bg-slate-950/80 backdrop-blur-sm z-50 flex items-center justify-center p-4">
                    <div class="bg-slate-900 border border-slate-800 rounded-2xl w-full max-w-3xl shadow-2xl p-6 space-y-4 max-h-[85vh] overflow-auto">
                        <h2 class="text-xl font-bold text-white">"Edit experiment"</h2>

                        <div class="grid grid-cols-1 md:grid-cols-2 gap-4">
                            <div class="space-y-3">
                                <h3 class="text-xs font-semibold text-slate-500 uppercase">"Basics"</h3>
                                <LabeledInput label="Title"
                                    value=Signal::derive(move || draft.with(|d| d.title.clone()))
                                    on_input=move |v| draft.update(|d| d.title = v) />
                                <LabeledInput label="Dataset"
                                    value=Signal::derive(move || draft.with(|d| d.dataset.clone()))
                                    on_input=move |v| draft.update(|d| d.dataset = v) />
                                <LabeledInput label="Scene type"
                                    value=Signal::derive(move || draft.with(|d| d.scene_type.clone()))
                                    on_input=move |v| draft.update(|d| d.scene_type = v) />

                                <div>
                                    <label class="block text-xs font-semibold text-slate-500 uppercase mb-1">"Type"</label>
                                    <select
                                        class="w-full bg-slate-950 border border-slate-800 rounded-lg px-3 py-2 text-white outline-none"
                                        on:change=move |ev| draft.update(|d| {
                                            d.kind = if event_target_value(&ev) == "video" {
                                                MediaKind::Video
                                            } else {
                                                MediaKind::Image
                                            };
                                        })
                                    >
                                        <option value="image" selected=move || draft.with(|d| d.kind == MediaKind::Image)>"image"</option>
                                        <option value="video" selected=move || draft.with(|d| d.kind == MediaKind::Video)>"video"</option>
                                    </select>
                                </div>
                                <LabeledInput label="Model"
                                    value=Signal::derive(move || draft.with(|d| d.model.clone()))
                                    on_input=move |v| draft.update(|d| d.model = v) />
                                <LabeledInput label="Preprocessor"
                                    value=Signal::derive(move || draft.with(|d| d.preprocessor.clone()))
                                    on_input=move |v| draft.update(|d| d.preprocessor = v) />

                                <h3 class="text-xs font-semibold text-slate-500 uppercase pt-2">"Categories"</h3>
                                <div class="space-y-1">
                                    {CategoryKey::ALL.into_iter().map(|key| {
                                        view! {
                                            <label class="flex items-center space-x-2 text-sm text-slate-300">
                                                <input
                                                    type="checkbox"
                                                    prop:checked=move || draft.with(|d| d.categories.get(key))
                                                    on:change=move |ev| draft.update(|d| {
                                                        d.categories.set(key, event_target_checked(&ev));
                                                    })
                                                />
                                                <span>{key.label()}</span>
                                            </label>
                                        }
                                    }).collect_view()}
                                </div>

                                <h3 class="text-xs font-semibold text-slate-500 uppercase pt-2">"Scene"</h3>
                                <label class="flex items-center space-x-2 text-sm text-slate-300">
                                    <input type="checkbox"
                                        prop:checked=move || draft.with(|d| d.virtual_scene)
                                        on:change=move |ev| draft.update(|d| d.virtual_scene = event_target_checked(&ev)) />
                                    <span>"Virtual scene"</span>
                                </label>
                                <label class="flex items-center space-x-2 text-sm text-slate-300">
                                    <input type="checkbox"
                                        prop:checked=move || draft.with(|d| d.real_scene)
                                        on:change=move |ev| draft.update(|d| d.real_scene = event_target_checked(&ev)) />
                                    <span>"Real scene"</span>
                                </label>
                            </div>

                            <div class="space-y-3">
                                <h3 class="text-xs font-semibold text-slate-500 uppercase">"Metrics"</h3>
                                <div class="grid grid-cols-2 gap-2">
                                    {MetricKey::ALL.into_iter().map(|metric| {
                                        view! {
                                            <div>
                                                <label class="block text-[10px] text-slate-500 mb-0.5">{metric.label()}</label>
                                                <input
                                                    type="number"
                                                    step="any"
                                                    class="w-full bg-slate-950 border border-slate-800 rounded-lg px-2 py-1 text-sm text-white outline-none"
                                                    prop:value=move || draft.with(|d| {
                                                        d.metrics.get(metric).map(|v| v.to_string()).unwrap_or_default()
                                                    })
                                                    on:input=move |ev| draft.update(|d| {
                                                        d.metrics.set(metric, event_target_value(&ev).parse().ok());
                                                    })
                                                />
                                            </div>
                                        }
                                    }).collect_view()}
                                </div>

                                <h3 class="text-xs font-semibold text-slate-500 uppercase pt-2">"Pipeline"</h3>
                                <div class="space-y-1">
                                    <label class="flex items-center space-x-2 text-sm text-slate-300">
                                        <input type="checkbox"
                                            prop:checked=move || draft.with(|d| d.preprocessed)
                                            on:change=move |ev| draft.update(|d| d.preprocessed = event_target_checked(&ev)) />
                                        <span>"Preprocessed"</span>
                                    </label>
                                    <label class="flex items-center space-x-2 text-sm text-slate-300">
                                        <input type="checkbox"
                                            prop:checked=move || draft.with(|d| d.trained)
                                            on:change=move |ev| draft.update(|d| d.trained = event_target_checked(&ev)) />
                                        <span>"Trained"</span>
                                    </label>
                                    <label class="flex items-center space-x-2 text-sm text-slate-300">
                                        <input type="checkbox"
                                            prop:checked=move || draft.with(|d| d.evaluated)
                                            on:change=move |ev| draft.update(|d| d.evaluated = event_target_checked(&ev)) />
                                        <span>"Evaluated"</span>
                                    </label>
                                    <label class="flex items-center space-x-2 text-sm text-slate-300">
                                        <input type="checkbox"
                                            prop:checked=move || draft.with(|d| d.successful)
                                            on:change=move |ev| draft.update(|d| d.successful = event_target_checked(&ev)) />
                                        <span>"Successful"</span>
                                    </label>
                                </div>
                                <LabeledInput label="Error"
                                    value=Signal::derive(move || draft.with(|d| d.error.clone()))
                                    on_input=move |v| draft.update(|d| d.error = v) />
                            </div>
                        </div>

                        <div class="flex justify-end space-x-3 pt-4">
                            <button
                                on:click=move |_| editing.set(None)
                                class="px-4 py-2 text-slate-400 hover:text-white transition-colors"
                            >
                                "Cancel"
                            </button>
                            <button
                                on:click=save
                                class="px-6 py-2 bg-blue-600 hover:bg-blue-500 text-white rounded-lg font-medium transition-colors"
                            >
                                "Save changes"
                            </button>
                        </div>
                    </div>
                </div>
            }
        })}
    }
}

#[component]
fn LabeledInput(
    label: &'static str,
    value: Signal<String>,
    on_input: impl Fn(String) + 'static,
) -> impl IntoView {
    view! {
        <div>
            <label class="block text-xs font-semibold text-slate-500 uppercase mb-1">{label}</label>
            <input
                type="text"
                class="w-full bg-slate-950 border border-slate-800 rounded-lg px-3 py-2 text-white focus:border-blue-500 outline-none"
                prop:value=value
                on:input=move |ev| on_input(event_target_value(&ev))
            />
        </div>
    }
}

// ─── Metrics page ────────────────────────────────────────────────────────────

#[component]
fn MetricsPage() -> impl IntoView {
    let ctx = use_context::<DataContext>().expect("DataContext not found");
    let primary = RwSignal::new(PrimaryFilter::Model);
    let metrics = RwSignal::new(vec![MetricKey::Psnr, MetricKey::Ssim, MetricKey::Lpips]);
    let active_metric = RwSignal::new(MetricKey::Psnr);

    let summary = Memo::new(move |_| {
        pivot(
            &ctx.records.get(),
            &metrics.get(),
            &CategoryKey::ALL,
            primary.get(),
            PivotOptions::default(),
        )
    });

    view! {
        {move || match ctx.load.get() {
            LoadState::Loading => view! {
                <div class="p-12 text-center text-slate-500">"Loading experiments..."</div>
            }
            .into_any(),
            LoadState::Failed(e) => view! {
                <div class="h-full flex flex-col items-center justify-center space-y-4 text-center">
                    <TriangleAlert size=48 />
                    <h2 class="text-xl font-bold text-white">"Could not load experiments"</h2>
                    <p class="text-red-400 text-sm font-mono">{e}</p>
                </div>
            }
            .into_any(),
            LoadState::Ready => view! {
                <div class="space-y-6">
                    <h1 class="text-3xl font-bold text-white">"Category metrics"</h1>

                    <div class="bg-slate-900 border border-slate-800 rounded-2xl p-4 flex flex-wrap items-center gap-4">
                        <div class="flex items-center space-x-3">
                            <label class="text-xs font-semibold text-slate-500 uppercase">"Compare by"</label>
                            <select
                                class="bg-slate-950 border border-slate-800 rounded-lg px-3 py-2 text-sm text-white outline-none"
                                on:change=move |ev| {
                                    if let Some(p) = PrimaryFilter::parse(&event_target_value(&ev)) {
                                        primary.set(p);
                                    }
                                }
                            >
                                <option value="model">"Model"</option>
                                <option value="preprocessor">"Preprocessor"</option>
                            </select>
                        </div>
                        <div class="flex flex-wrap gap-2">
                            {MetricKey::ALL.into_iter().map(|metric| {
                                let active = move || metrics.with(|m| m.contains(&metric));
                                view! {
                                    <button
                                        on:click=move |_| metrics.update(|m| {
                                            if let Some(pos) = m.iter().position(|x| *x == metric) {
                                                m.remove(pos);
                                            } else {
                                                m.push(metric);
                                            }
                                        })
                                        class=move || format!(
                                            "px-2 py-1 rounded-md text-xs border transition-colors {}",
                                            if active() {
                                                "bg-blue-600/10 border-blue-500/50 text-blue-300"
                                            } else {
                                                "border-slate-700 text-slate-500 hover:text-slate-300"
                                            }
                                        )
                                    >
                                        {metric.label()}
                                    </button>
                                }
                            }).collect_view()}
                        </div>
                    </div>

                    <div class="bg-slate-900 border border-slate-800 rounded-2xl p-4 overflow-x-auto">
                        <table class="w-full text-left border-collapse min-w-max">
                            <thead class="bg-slate-950 text-xs uppercase text-slate-500 font-semibold">
                                <tr>
                                    <th class="p-3 border-b border-slate-800">
                                        {move || primary.get().label()}
                                    </th>
                                    <th class="p-3 border-b border-slate-800">"Metric"</th>
                                    {move || {
                                        let s = summary.get();
                                        s.table.categories.iter().zip(&s.table.counts).map(|(category, count)| view! {
                                            <th class="p-3 border-b border-slate-800 text-center">
                                                {category.label()}<br/>
                                                <span class="text-slate-600">"(" {*count} ")"</span>
                                            </th>
                                        }).collect_view()
                                    }}
                                </tr>
                            </thead>
                            <tbody class="divide-y divide-slate-800/50 text-sm text-slate-300">
                                {move || summary.get().table.rows.into_iter().map(|row| {
                                    let primary_value = row.primary_value;
                                    let rows_len = row.cells.len();
                                    row.cells.into_iter().enumerate().map(|(i, cells)| {
                                        let label = if i == 0 { primary_value.clone() } else { String::new() };
                                        let last = i + 1 == rows_len;
                                        view! {
                                            <tr class=move || if last { "border-b border-slate-800" } else { "" }>
                                                <td class="p-3 font-medium text-white">{label}</td>
                                                <td class="p-3">{cells.metric.label()}</td>
                                                {cells.cells.into_iter().map(|cell| view! {
                                                    <td class="p-3 text-center font-mono">{cell}</td>
                                                }).collect_view()}
                                            </tr>
                                        }
                                    }).collect_view()
                                }).collect_view()}
                            </tbody>
                        </table>
                    </div>

                    <div class="bg-slate-900 border border-slate-800 rounded-2xl p-4 space-y-4">
                        <div class="flex space-x-1 bg-slate-950 border border-slate-800 p-1 rounded-xl w-fit">
                            {move || metrics.get().into_iter().map(|metric| {
                                let is_active = move || active_metric.get() == metric;
                                view! {
                                    <button
                                        on:click=move |_| active_metric.set(metric)
                                        class=move || format!(
                                            "px-4 py-2 rounded-lg text-sm font-medium transition-all duration-200 {}",
                                            if is_active() {
                                                "bg-slate-800 text-white shadow-sm"
                                            } else {
                                                "text-slate-500 hover:text-slate-300"
                                            }
                                        )
                                    >
                                        {metric.label()}
                                    </button>
                                }
                            }).collect_view()}
                        </div>
                        <div class="h-[420px] bg-slate-950/60 border border-slate-800/50 rounded-xl overflow-hidden">
                            {move || {
                                let chart = summary
                                    .get()
                                    .charts
                                    .into_iter()
                                    .find(|c| c.metric == active_metric.get());
                                match chart {
                                    Some(chart) => view! { <BarChart chart=chart /> }.into_any(),
                                    None => view! {
                                        <div class="p-8 text-center text-slate-600">"Select a metric to chart"</div>
                                    }
                                    .into_any(),
                                }
                            }}
                        </div>
                    </div>
                </div>
            }
            .into_any(),
        }}
    }
}

// ─── Charts ──────────────────────────────────────────────────────────────────

use plotly::{
    common::Title,
    layout::{Axis, BarMode, Margin},
    Bar, Layout, Plot,
};

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = Plotly, js_name = newPlot)]
    fn new_plot(root: &JsValue, data: &JsValue, layout: &JsValue, config: &JsValue);
}

#[component]
fn BarChart(chart: MetricChart) -> impl IntoView {
    let div_ref = NodeRef::<leptos::html::Div>::new();

    Effect::new(move |_| {
        if let Some(div) = div_ref.get() {
            let mut p = Plot::new();
            let layout = Layout::new()
                .bar_mode(BarMode::Group)
                .margin(Margin::new().left(60).right(30).top(30).bottom(60))
                .show_legend(true)
                .paper_background_color("rgba(0,0,0,0)")
                .plot_background_color("rgba(0,0,0,0)")
                .font(plotly::common::Font::new().color("#94a3b8"))
                .x_axis(Axis::new().show_grid(false))
                .y_axis(
                    Axis::new()
                        .title(Title::from(chart.metric.label()))
                        .show_grid(true)
                        .grid_color("#1e293b"),
                );
            p.set_layout(layout);

            let labels: Vec<String> = chart.points.iter().map(|pt| pt.label.clone()).collect();
            for (i, series) in chart.series.iter().enumerate() {
                let values: Vec<Option<f64>> =
                    chart.points.iter().map(|pt| pt.values[i]).collect();
                let trace = Bar::new(labels.clone(), values).name(series.as_str());
                p.add_trace(trace);
            }

            let json_str = p.to_json();
            if let Ok(js_value) = js_sys::JSON::parse(&json_str) {
                let data =
                    js_sys::Reflect::get(&js_value, &"data".into()).unwrap_or(JsValue::UNDEFINED);
                let layout =
                    js_sys::Reflect::get(&js_value, &"layout".into()).unwrap_or(JsValue::UNDEFINED);
                let config =
                    js_sys::Reflect::get(&js_value, &"config".into()).unwrap_or(JsValue::UNDEFINED);

                let div_element: &web_sys::HtmlElement = &div;
                new_plot(&div_element.into(), &data, &layout, &config);
            } else {
                leptos::logging::error!("Failed to parse Plotly JSON");
            }
        }
    });

    view! {
        <div class="w-full h-full p-2">
            <div node_ref=div_ref class="w-full h-full"></div>
        </div>
    }
}

fn main() {
    let window = web_sys::window().expect("no global `window` exists");
    let local_storage = window
        .local_storage()
        .expect("no local storage exists")
        .expect("no local storage exists");
    let debug_enabled =
        local_storage.get_item("debug_enabled").unwrap_or_default() == Some("true".to_string());

    let level = if debug_enabled {
        log::Level::Debug
    } else {
        log::Level::Info
    };
    _ = console_log::init_with_level(level);
    console_error_panic_hook::set_once();
    mount_to_body(App);
}
