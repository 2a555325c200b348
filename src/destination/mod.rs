// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

mod fetch;
mod model;

pub use fetch::{fetch_destination_catalog, fetch_project_medias, find_project};
pub use model::{Media, Project, ProjectDetail, VIDEO_MEDIA_TYPE};
