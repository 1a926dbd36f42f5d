//-----------------------------------------------------
// ROUTES
//-----------------------------------------------------

use crate::auth::{handle_rejection, with_api_key};
use crate::handlers::*;
use crate::manager::ZfsManager;
use crate::models::*;
use crate::utils::{with_action_tracking, ActionTracker};
use std::convert::Infallible;
use warp::{Filter, Reply};

fn with_zfs(zfs: ZfsManager) -> impl Filter<Extract = (ZfsManager,), Error = Infallible> + Clone {
    warp::any().map(move || zfs)
}

fn with_tracker(
    tracker: ActionTracker,
) -> impl Filter<Extract = (ActionTracker,), Error = Infallible> + Clone {
    warp::any().map(move || tracker.clone())
}

/// Every agent route, with rejections rendered as JSON errors.
/// `/health` is open, everything under `/v1` needs the API key.
pub fn routes(
    api_key: String,
    zfs: ZfsManager,
    tracker: ActionTracker,
) -> impl Filter<Extract = (impl Reply,), Error = Infallible> + Clone {
    let auth = with_api_key(api_key);
    let zfs = with_zfs(zfs);
    let track = {
        let tracker = tracker.clone();
        move |name: &'static str| with_action_tracking(name, tracker.clone())
    };

    // GET /health - Health check endpoint
    let health_routes = warp::get()
        .and(warp::path("health"))
        .and(warp::path::end())
        .and(with_tracker(tracker))
        .and_then(health_check_handler);

    // GET /v1/errors/{code} - Error table lookup
    let error_routes = warp::get()
        .and(warp::path!("v1" / "errors" / i32))
        .and(auth.clone())
        .and_then(error_lookup_handler);

    // Define pool-related routes
    let pool_routes = {
        // GET /v1/pools - List all pools
        let list = warp::get()
            .and(warp::path!("v1" / "pools"))
            .and(auth.clone())
            .and(track("list_pools"))
            .and(zfs.clone())
            .and_then(list_pools_handler);

        // GET /v1/pools/{name} - Pool summary
        let status = warp::get()
            .and(warp::path!("v1" / "pools" / String))
            .and(auth.clone())
            .and(track("get_pool_status"))
            .and(zfs.clone())
            .and_then(get_pool_status_handler);

        // POST /v1/pools/{name}/get - Read a pool property
        let get = warp::post()
            .and(warp::path!("v1" / "pools" / String / "get"))
            .and(auth.clone())
            .and(warp::body::json())
            .and(track("get_pool_property"))
            .and(zfs.clone())
            .and_then(get_pool_property_handler);

        // POST /v1/pools/{name}/set - Set a pool property
        let set = warp::post()
            .and(warp::path!("v1" / "pools" / String / "set"))
            .and(auth.clone())
            .and(warp::body::json())
            .and(track("set_pool_property"))
            .and(zfs.clone())
            .and_then(set_pool_property_handler);

        list.or(status).or(get).or(set)
    };

    // Define dataset-related routes
    let dataset_routes = {
        // GET /v1/datasets - Root dataset of every pool
        let list = warp::get()
            .and(warp::path!("v1" / "datasets"))
            .and(auth.clone())
            .and(track("list_datasets"))
            .and(zfs.clone())
            .and_then(list_datasets_handler);

        let post = |action: &'static str| {
            warp::post()
                .and(warp::path("v1"))
                .and(warp::path("datasets"))
                .and(warp::path(action))
                .and(warp::path::end())
                .and(auth.clone())
        };

        let open = post("open")
            .and(warp::body::json())
            .and(track("open_dataset"))
            .and(zfs.clone())
            .and_then(open_dataset_handler);
        let exists = post("exists")
            .and(warp::body::json())
            .and(track("dataset_exists"))
            .and(zfs.clone())
            .and_then(dataset_exists_handler);
        let create = post("create")
            .and(warp::body::json())
            .and(track("create_dataset"))
            .and(zfs.clone())
            .and_then(create_dataset_handler);
        let get = post("get")
            .and(warp::body::json())
            .and(track("get_property"))
            .and(zfs.clone())
            .and_then(get_property_handler);
        let get_user = post("get_user_prop")
            .and(warp::body::json())
            .and(track("get_user_property"))
            .and(zfs.clone())
            .and_then(get_user_property_handler);
        let set = post("set")
            .and(warp::body::json())
            .and(track("set_property"))
            .and(zfs.clone())
            .and_then(set_property_handler);
        let rename = post("rename")
            .and(warp::body::json())
            .and(track("rename_dataset"))
            .and(zfs.clone())
            .and_then(rename_dataset_handler);
        let promote = post("promote")
            .and(warp::body::json())
            .and(track("promote_dataset"))
            .and(zfs.clone())
            .and_then(promote_dataset_handler);
        let destroy = post("destroy")
            .and(warp::body::json())
            .and(track("destroy_dataset"))
            .and(zfs.clone())
            .and_then(destroy_dataset_handler);
        let children = post("children")
            .and(warp::body::json())
            .and(track("dataset_children"))
            .and(zfs.clone())
            .and_then(dataset_children_handler);

        list.or(open)
            .or(exists)
            .or(create)
            .or(get)
            .or(get_user)
            .or(set)
            .or(rename)
            .or(promote)
            .or(destroy)
            .or(children)
    };

    // Define snapshot-related routes
    let snapshot_routes = {
        // POST /v1/snapshots/create
        let create = warp::post()
            .and(warp::path!("v1" / "snapshots" / "create"))
            .and(auth.clone())
            .and(warp::body::json())
            .and(track("create_snapshot"))
            .and(zfs.clone())
            .and_then(create_snapshot_handler);

        // POST /v1/snapshots/clone
        let clone = warp::post()
            .and(warp::path!("v1" / "snapshots" / "clone"))
            .and(auth.clone())
            .and(warp::body::json())
            .and(track("clone_snapshot"))
            .and(zfs.clone())
            .and_then(clone_snapshot_handler);

        // POST /v1/snapshots/rollback
        let rollback = warp::post()
            .and(warp::path!("v1" / "snapshots" / "rollback"))
            .and(auth.clone())
            .and(warp::body::json())
            .and(track("rollback"))
            .and(zfs.clone())
            .and_then(rollback_handler);

        create.or(clone).or(rollback)
    };

    // Define mount and share routes
    let sharing_routes = {
        let mount = warp::post()
            .and(warp::path!("v1" / "mounts" / "mount"))
            .and(auth.clone())
            .and(warp::body::json())
            .and(track("mount"))
            .and(zfs.clone())
            .and_then(|body: MountRequest, zfs| mount_handler(MountAction::Mount, body, zfs));

        let unmount = warp::post()
            .and(warp::path!("v1" / "mounts" / "unmount"))
            .and(auth.clone())
            .and(warp::body::json())
            .and(track("unmount"))
            .and(zfs.clone())
            .and_then(|body: MountRequest, zfs| mount_handler(MountAction::Unmount, body, zfs));

        let mount_status = warp::post()
            .and(warp::path!("v1" / "mounts" / "status"))
            .and(auth.clone())
            .and(warp::body::json())
            .and(track("mount_status"))
            .and(zfs.clone())
            .and_then(mount_status_handler);

        let share = warp::post()
            .and(warp::path!("v1" / "shares" / "share"))
            .and(auth.clone())
            .and(warp::body::json())
            .and(track("share"))
            .and(zfs.clone())
            .and_then(|body: ShareRequest, zfs| share_handler(ShareAction::Share, body, zfs));

        let unshare = warp::post()
            .and(warp::path!("v1" / "shares" / "unshare"))
            .and(auth.clone())
            .and(warp::body::json())
            .and(track("unshare"))
            .and(zfs.clone())
            .and_then(|body: ShareRequest, zfs| share_handler(ShareAction::Unshare, body, zfs));

        let share_status = warp::post()
            .and(warp::path!("v1" / "shares" / "status"))
            .and(auth.clone())
            .and(warp::body::json())
            .and(track("share_status"))
            .and(zfs.clone())
            .and_then(share_status_handler);

        mount
            .or(unmount)
            .or(mount_status)
            .or(share)
            .or(unshare)
            .or(share_status)
    };

    // Combine all routes
    health_routes
        .or(error_routes)
        .or(pool_routes)
        .or(dataset_routes)
        .or(snapshot_routes)
        .or(sharing_routes)
        .recover(handle_rejection)
        .with(warp::trace::request())
}
