//! Data Upload Page

use leptos::*;

use crate::components::{DropZone, UploadProgressList, UploadedFilesTable};

#[component]
pub fn Upload() -> impl IntoView {
    view! {
        <div class="space-y-6">
            <h1 class="text-3xl font-bold">"Data Upload"</h1>
            <DropZone />
            <UploadProgressList />
            <div class="bg-gray-800 rounded-lg p-4 border border-gray-700">
                <h2 class="text-lg font-semibold mb-3">"Uploaded Files"</h2>
                <UploadedFilesTable />
            </div>
        </div>
    }
}
