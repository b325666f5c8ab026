mod trace_context;
