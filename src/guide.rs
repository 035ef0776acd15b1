/// `GET /help` 与 `ensemble guide` 输出的使用说明
pub const GUIDE: &str = r#"ensemble runs a batch of API calls for you.

Describe every call in one JSON document and POST it to this service. Each
call gets an "id"; the response document lists one result per call, in the
same order, tagged with that id.

Every call needs a "url" and a "method" (GET, POST, PUT or DELETE, in any
case); a document with any other method is rejected as a whole.

Calls run concurrently unless "strictorder" is true, in which case they run
one after another in the order given. For concurrent batches "timeout"
(milliseconds) bounds how long the whole batch may take; calls still running
at that point are reported with code 0. Strict batches always run to the end,
each call bounded only by the per-call timeout.

{
    "requests": [{
        "id": "1",
        "url": "http://localhost:8080/test1?foo=bar",
        "method": "GET"
    }, {
        "id": "2",
        "url": "http://localhost:8080/test2",
        "method": "POST",
        "data": "boo=far"
    }],
    "strictorder": false,
    "timeout": 5000
}

A call may depend on other calls. Dependencies run in order before the call
itself; the first one that does not answer with a 2xx status stops the chain
and its result is reported in place of the call. With "useData" the bodies of
the dependencies are fed into "data": "doJoin" joins them with "joinChar" and
puts the result where "%s" appears, otherwise they are combined into a JSON
array. With "useDepHeader", the headers named in "DepHeaders" are copied from
the last dependency's response.

{
    "requests": [{
        "id": "2",
        "url": "http://localhost:8080/test2",
        "method": "POST",
        "data": "{\"data\":[%s]}",
        "dependency": [
            {"request": {"id": "21", "url": "http://localhost:8080/provide1", "method": "GET"}},
            {"request": {"id": "22", "url": "http://localhost:8080/provide2", "method": "GET"}}
        ],
        "useData": true,
        "doJoin": true,
        "joinChar": ",",
        "evalJson": true
    }],
    "strictorder": true
}

Set "evalJson" to receive the response body decoded under "object" as well as
the raw text under "data". Workload-wide "headers" are sent with every call;
with "useHeaders" the headers of your call to this service are forwarded too.
"#;
